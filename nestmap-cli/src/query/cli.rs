use clap::{Arg, ArgAction, Command};

pub const QUERY_CMD: &str = "query";

pub fn create_query_cli() -> Command {
    Command::new(QUERY_CMD)
        .author("Databio")
        .about("Map regions of a source sequence onto everything aligned to them.")
        .arg_required_else_help(true)
        .arg(Arg::new("store").required(true).help("Alignment store directory"))
        .arg(
            Arg::new("regions")
                .required(true)
                .num_args(1..)
                .help("Regions as seq:start-end, with an optional (+) or (-) strand"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print one JSON object per aligned pair"),
        )
}
