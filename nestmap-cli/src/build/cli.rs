use clap::{Arg, ArgAction, Command, arg};

pub const BUILD_CMD: &str = "build";

pub fn create_build_cli() -> Command {
    Command::new(BUILD_CMD)
        .author("Databio")
        .about("Build an alignment store from a text edge dump.")
        .arg_required_else_help(true)
        .arg(Arg::new("edges").required(true).help("Edge dump to read (.gz ok), - for stdin"))
        .arg(arg!(-o --output <output> "Directory to write the alignment store to").required(true))
        .arg(arg!(-l --lengths <lengths> "Two column file of sequence lengths"))
        .arg(arg!(-c --config <config> "TOML file with build options"))
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .action(ArgAction::SetTrue)
                .help("Skip malformed edges instead of failing"),
        )
}
