use std::io;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use nestmap_align::AlignmentStore;

pub fn run_dump(matches: &ArgMatches) -> Result<()> {
    let store = matches
        .get_one::<String>("store")
        .expect("A path to an alignment store is required.");

    let store = AlignmentStore::open(store)
        .with_context(|| format!("Failed to open alignment store {}", store))?;

    let edges = match matches.get_one::<String>("output") {
        Some(output) => store
            .dump_to_path(output)
            .with_context(|| format!("Failed to write {}", output))?,
        None => store.dump(io::stdout().lock())?,
    };
    info!("Dumped {} edges", edges);

    Ok(())
}
