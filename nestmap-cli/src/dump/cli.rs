use clap::{Arg, Command, arg};

pub const DUMP_CMD: &str = "dump";

pub fn create_dump_cli() -> Command {
    Command::new(DUMP_CMD)
        .author("Databio")
        .about("Write an alignment store back out as a text edge dump.")
        .arg_required_else_help(true)
        .arg(Arg::new("store").required(true).help("Alignment store directory"))
        .arg(arg!(-o --output <output> "File to write to (.gz to compress), stdout if omitted"))
}
