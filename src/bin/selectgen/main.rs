//! Prints select statements as JSON lines.
//!
//! Running it without arguments prints a single sample statement. Set `RUST_LOG=info` to see
//! what it's doing.
mod args;
mod commands;

use crate::args::{Args, Command};
use clap::Parser;
use colored::Colorize;
use select_gen::{config, Error};
use std::process::exit;

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(error) = run(args) {
        eprintln!("{intro}: {error}", intro = "error".bold().red());
        exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let command = args.command.unwrap_or(Command::Sample { count: None });

    match command {
        Command::Sample { count } => {
            commands::sample(&config::read(args.config.as_deref())?, count)
        }
        Command::Metadata { workload } => commands::metadata(&workload),
        Command::Generate(params) => {
            commands::generate(&config::read(args.config.as_deref())?, &params)
        }
        Command::Dnf { input } => commands::dnf(input.as_deref()),
    }
}
