use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use nestmap_align::AlignmentStore;
use nestmap_io::format_edge;

use crate::region::parse_region;

pub fn run_query(matches: &ArgMatches) -> Result<()> {
    let store = matches
        .get_one::<String>("store")
        .expect("A path to an alignment store is required.");

    let regions: Vec<&String> = matches
        .get_many::<String>("regions")
        .expect("At least one region is required.")
        .collect();

    let json = matches.get_flag("json");

    let store = AlignmentStore::open(store)
        .with_context(|| format!("Failed to open alignment store {}", store))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for region in regions {
        let query = parse_region(region)?;
        let pairs = store.aligned_to_interval(&query)?;
        for pair in pairs {
            if json {
                serde_json::to_writer(&mut out, &pair)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", format_edge(&pair.src, &pair.dst))?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
