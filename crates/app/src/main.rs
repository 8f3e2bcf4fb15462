use std::path::PathBuf;

use clap::Parser;
use engine::{DocumentStore, Engine};

use crate::cli::{Cli, Command};

mod cli;
mod commands;
mod error;
mod settings;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> error::Result<()> {
    let settings = settings::Settings::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "reparto={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut engine = Engine::builder()
        .store(DocumentStore::new(&settings.data_file))
        .build()?;
    if let Some(err) = engine.load_error() {
        tracing::warn!("starting from an empty delivery book: {err}");
    }

    match cli.command {
        Command::Customer(command) => commands::customer(&mut engine, command),
        Command::Zone(command) => commands::zone(&mut engine, command),
        Command::Settle(args) => {
            commands::settle(&mut engine, args, &PathBuf::from(&settings.export_dir))
        }
        Command::Cash(command) => commands::cash(&mut engine, command),
    }
}
