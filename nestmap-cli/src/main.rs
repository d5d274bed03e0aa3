mod build;
mod dump;
mod info;
mod overlap;
mod query;
mod region;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "nestmap";
    pub const BIN_NAME: &str = "nestmap";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Build and query nested containment interval stores and the alignment stores built on them.")
        .subcommand_required(true)
        .subcommand(build::cli::create_build_cli())
        .subcommand(query::cli::create_query_cli())
        .subcommand(overlap::cli::create_overlap_cli())
        .subcommand(dump::cli::create_dump_cli())
        .subcommand(info::cli::create_info_cli())
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // BUILD
        //
        Some((build::cli::BUILD_CMD, matches)) => {
            build::handlers::run_build(matches)?;
        }

        //
        // QUERY
        //
        Some((query::cli::QUERY_CMD, matches)) => {
            query::handlers::run_query(matches)?;
        }

        //
        // OVERLAP
        //
        Some((overlap::cli::OVERLAP_CMD, matches)) => {
            overlap::handlers::run_overlap(matches)?;
        }

        //
        // DUMP
        //
        Some((dump::cli::DUMP_CMD, matches)) => {
            dump::handlers::run_dump(matches)?;
        }

        //
        // INFO
        //
        Some((info::cli::INFO_CMD, matches)) => {
            info::handlers::run_info(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
