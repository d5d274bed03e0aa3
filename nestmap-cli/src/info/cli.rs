use clap::{Arg, Command};

pub const INFO_CMD: &str = "info";

pub fn create_info_cli() -> Command {
    Command::new(INFO_CMD)
        .author("Databio")
        .about("Describe an interval store file or an alignment store directory as JSON.")
        .arg_required_else_help(true)
        .arg(Arg::new("store").required(true))
}
