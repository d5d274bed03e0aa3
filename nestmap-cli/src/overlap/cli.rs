use clap::{Arg, Command};

pub const OVERLAP_CMD: &str = "overlap";

pub fn create_overlap_cli() -> Command {
    Command::new(OVERLAP_CMD)
        .author("Databio")
        .about("List the stored intervals overlapping a region.")
        .arg_required_else_help(true)
        .arg(
            Arg::new("store")
                .required(true)
                .help("An interval store file, or an alignment store directory"),
        )
        .arg(
            Arg::new("regions")
                .required(true)
                .num_args(1..)
                .help("Regions as seq:start-end, with an optional (+) or (-) strand"),
        )
}
