use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::ArgMatches;

use nestmap_align::AlignmentStore;
use nestmap_store::IntervalStore;

use crate::region::parse_region;

/// Where the intervals come from: one store file, or every store in an alignment store.
enum Source {
    Single(Arc<IntervalStore>),
    Aligned(AlignmentStore),
}

impl Source {
    fn open(path: &Path) -> Result<Source> {
        if path.is_dir() {
            Ok(Source::Aligned(AlignmentStore::open(path)?))
        } else {
            Ok(Source::Single(Arc::new(IntervalStore::open(path)?)))
        }
    }

    fn store_for(&self, seq_id: &str) -> Result<Option<Arc<IntervalStore>>> {
        match self {
            Source::Aligned(store) => Ok(store.interval_store(seq_id)?),
            Source::Single(store) if store.seq_id() == seq_id => Ok(Some(Arc::clone(store))),
            Source::Single(store) => bail!(
                "{} holds intervals of {}, not {}",
                store.path().display(),
                store.seq_id(),
                seq_id
            ),
        }
    }
}

pub fn run_overlap(matches: &ArgMatches) -> Result<()> {
    let store = matches
        .get_one::<String>("store")
        .expect("A path to a store is required.");

    let regions: Vec<&String> = matches
        .get_many::<String>("regions")
        .expect("At least one region is required.")
        .collect();

    let source = Source::open(Path::new(store))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for region in regions {
        let query = parse_region(region)?;
        let Some(store) = source.store_for(&query.seq_id)? else {
            continue;
        };
        for hit in store.overlap_interval(&query)? {
            writeln!(out, "{}\t{}", hit.interval, hit.position)?;
        }
    }

    out.flush()?;
    Ok(())
}
