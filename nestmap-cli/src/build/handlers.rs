use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use nestmap_align::AlignmentStoreBuilder;
use nestmap_core::utils::{get_dynamic_reader_w_stdin, get_sequence_lengths};
use nestmap_io::EdgeDumpReader;
use nestmap_store::BuildOptions;

pub fn run_build(matches: &ArgMatches) -> Result<()> {
    let edges = matches
        .get_one::<String>("edges")
        .expect("A path to an edge dump is required.");

    let output = matches
        .get_one::<String>("output")
        .expect("An output directory is required.");

    let mut options = match matches.get_one::<String>("config") {
        Some(config) => BuildOptions::try_from(Path::new(config))
            .with_context(|| format!("Failed to read build options from {}", config))?,
        None => BuildOptions::default(),
    };
    if matches.get_flag("lenient") {
        options.lenient = true;
    }

    let mut builder = AlignmentStoreBuilder::new().with_options(options);

    if let Some(lengths) = matches.get_one::<String>("lengths") {
        let lengths = get_sequence_lengths(lengths)?;
        info!("Declared {} sequence lengths", lengths.len());
        for (seq_id, length) in lengths {
            builder.declare_length(seq_id, length);
        }
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} edges {msg}")?
            .tick_chars("/-\\| "),
    );

    let mut reader = EdgeDumpReader::new(get_dynamic_reader_w_stdin(edges)?);
    while let Some(parsed) = reader.next() {
        builder
            .add_parsed(parsed)
            .with_context(|| format!("Failed at line {} of {}", reader.line_number(), edges))?;
        bar.set_position(builder.edge_count() as u64);
    }
    bar.set_message("sealing");

    let report = builder.seal(output)?;
    bar.finish_with_message(format!(
        "sealed {} sequences into {}",
        report.sequences,
        report.dir.display()
    ));

    if report.skipped > 0 {
        eprintln!("Skipped {} malformed edges", report.skipped);
    }

    Ok(())
}
