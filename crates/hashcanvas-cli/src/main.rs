//! HashCanvas CLI - view and place pixels on a ledger-memo canvas.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "hashcanvas")]
#[command(author, version, about = "HashCanvas - a pixel canvas stored in ledger memos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: search for hashcanvas.toml upwards)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new HashCanvas project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Print the reconciled canvas
    Show {
        /// Read a saved mirror node transactions page instead of fetching
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Print the canvas state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh the canvas until interrupted
    Watch {
        /// Seconds between refreshes
        #[arg(short, long, default_value = "5")]
        interval: u64,
    },

    /// Encode or decode placement memos
    Memo {
        #[command(subcommand)]
        command: MemoCommands,
    },

    /// Print the unsigned transfer that places a pixel
    Prepare {
        /// Paying account id (e.g. 0.0.4242)
        #[arg(long)]
        payer: String,
        /// Column
        x: u32,
        /// Row
        y: u32,
        /// Color as #RRGGBB
        color: String,
    },
}

#[derive(Subcommand)]
enum MemoCommands {
    /// Build the memo text for a placement
    Encode {
        x: u32,
        y: u32,
        color: String,

        /// Print base64 as the mirror node stores it
        #[arg(long)]
        base64: bool,
    },

    /// Parse a memo back into a placement
    Decode {
        memo: String,

        /// Input is base64 as returned by the mirror node
        #[arg(long)]
        base64: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    dispatch(cli.command, cli.config.as_deref()).await
}

async fn dispatch(command: Commands, config_path: Option<&Path>) -> Result<()> {
    // `init` runs before any config file exists.
    let load = || Config::load(config_path);

    match command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Show { from_file, json } => {
            commands::show::run(&load()?, from_file.as_deref(), json).await
        }
        Commands::Watch { interval } => commands::watch::run(&load()?, interval).await,
        Commands::Memo { command } => match command {
            MemoCommands::Encode { x, y, color, base64 } => {
                commands::memo::encode(&load()?, x, y, &color, base64)
            }
            MemoCommands::Decode { memo, base64 } => {
                commands::memo::decode(&load()?, &memo, base64)
            }
        },
        Commands::Prepare { payer, x, y, color } => {
            commands::prepare::run(&load()?, &payer, x, y, &color)
        }
    }
}
