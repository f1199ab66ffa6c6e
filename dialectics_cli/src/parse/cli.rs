use std::path::PathBuf;

use clap::{value_parser, Arg, Command};

pub fn cli() -> Command {
    Command::new("dialectics_cli")
        .about("Runs a dialectical-structures debate simulation from a configuration file")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a simulation configuration file (.toml or .json)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .required(false)
                .num_args(1)
                .help("Override the configuration file's random seed"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .value_parser(value_parser!(bool))
                .required(false)
                .num_args(0)
                .help("Suppress the decision log, printing only the termination summary"),
        )
}
