//! GitForge CLI - Main entry point

mod commit;
mod gitignore;
mod select;
mod setup;

use clap::{Parser, Subcommand};
use gitforge_foundation::{Error, Result};
use gitforge_template::WriteMode;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// GitForge - gitignore generation and AI commit messages for the terminal
#[derive(Parser, Debug)]
#[command(name = "gitforge")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available gitignore templates
    List {
        /// List locally cached templates instead of querying the index
        #[arg(long)]
        cached: bool,
    },
    /// Generate a .gitignore from templates
    Generate {
        /// Template names; leave empty to pick interactively
        templates: Vec<String>,

        /// Output path
        #[arg(short, long, default_value = ".gitignore")]
        output: PathBuf,

        /// Append to an existing output file (default)
        #[arg(long, conflicts_with = "overwrite")]
        append: bool,

        /// Replace the output file entirely
        #[arg(long)]
        overwrite: bool,

        /// Use only locally cached templates
        #[arg(long)]
        offline: bool,
    },
    /// Generate a commit message from the staged diff
    Commit {
        /// Extra guidance for the message
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Interactive provider/model/API key setup
    Config,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(args.command).await {
        Ok(()) => {}
        Err(Error::Cancelled) => {
            // The interactive step already printed its cancellation notice.
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::List { cached } => gitignore::list(cached).await,
        Command::Generate {
            templates,
            output,
            append: _,
            overwrite,
            offline,
        } => {
            let mode = if overwrite {
                WriteMode::Overwrite
            } else {
                WriteMode::Append
            };
            gitignore::generate(templates, &output, mode, offline).await
        }
        Command::Commit { context } => commit::run(context).await,
        Command::Config => setup::run(),
    }
}
