mod cli;
mod commands;
mod controller;
mod error;
mod logging;
mod manager;
mod model;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let path = match args.file {
        Some(path) => path,
        None => storage::default_tasks_path()?,
    };
    logging::init(&path)?;
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Tui => commands::tui(&path),
        cli::Command::List { section } => commands::list(&path, section),
        cli::Command::Add { name, section } => commands::add(&path, name, section),
        cli::Command::Toggle { index, section } => commands::toggle(&path, index, section),
        cli::Command::Path => commands::print_path(&path),
    }
}
