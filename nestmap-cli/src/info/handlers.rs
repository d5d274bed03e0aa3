use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use serde_json::{Value, json};

use nestmap_align::AlignmentStore;
use nestmap_store::IntervalStore;

pub fn run_info(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<String>("store")
        .expect("A path to a store is required.");

    let path = Path::new(path);
    let summary = if path.is_dir() {
        describe_alignment_store(&AlignmentStore::open(path)?)
    } else {
        describe_interval_store(&IntervalStore::open(path)?)
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn describe_interval_store(store: &IntervalStore) -> Value {
    let header = store.header();
    json!({
        "kind": "interval_store",
        "path": store.path(),
        "seq_id": store.seq_id(),
        "version": header.version,
        "intervals": store.len(),
        "roots": store.root_len(),
        "sequence_length": store.sequence_length(),
        "inferred_end": store.inferred_end(),
        "payload_bytes": header.payload_len,
    })
}

fn describe_alignment_store(store: &AlignmentStore) -> Value {
    let sequences: Vec<Value> = store
        .manifest()
        .sequences
        .iter()
        .map(|(seq_id, entry)| {
            json!({
                "seq_id": seq_id,
                "length": entry.length,
                "inferred_end": entry.inferred_end,
                "edges": entry.edges,
                "file": entry.file,
            })
        })
        .collect();

    json!({
        "kind": "alignment_store",
        "path": store.dir(),
        "edges": store.edge_count(),
        "sequences": sequences,
    })
}
