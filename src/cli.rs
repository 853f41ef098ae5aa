use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sisyphus", version, about = "Daily, weekly and monthly goals in your terminal")]
pub struct Cli {
    /// Task file to use instead of ~/sisyphus/tasks.json
    #[arg(long, global = true, env = "SISYPHUS_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the interactive TUI
    Tui,
    /// List tasks, optionally for a single section
    List {
        /// daily, weekly or monthly
        #[arg(long)]
        section: Option<String>,
    },
    /// Add a task
    Add {
        /// Name of the task
        name: String,
        /// daily, weekly or monthly (defaults to daily)
        #[arg(long)]
        section: Option<String>,
    },
    /// Toggle completion of the task at INDEX (as shown by `list`)
    Toggle {
        index: usize,
        /// daily, weekly or monthly (defaults to daily)
        #[arg(long)]
        section: Option<String>,
    },
    /// Print the path of the task file
    Path,
}
