//! Inlet CLI - reference-data imports in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod output;

use commands::{import, logs, sample, sessions, summary};

/// Inlet - import portfolio-tracker exports and inspect the results
#[derive(Parser)]
#[command(name = "inlet", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a platform export file (csv, xlsx, json, or zip)
    Import {
        /// Path to the export file
        file: PathBuf,
        /// Source platform (cointracking, waltio, blockpit, unknown)
        #[arg(long)]
        platform: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the latest import summary for a platform
    Summary {
        /// Source platform (defaults to the configured platform)
        #[arg(long)]
        platform: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a sample of records from an import session
    Sample {
        /// Session identifier
        session_id: i64,
        /// Number of records to show
        #[arg(long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent import sessions
    Sessions {
        /// Number of sessions to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent pipeline events
    Logs {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Show only errors
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result: Result<()> = match cli.command {
        Commands::Import {
            file,
            platform,
            json,
        } => import::run(&file, platform.as_deref(), json),
        Commands::Summary { platform, json } => summary::run(platform.as_deref(), json),
        Commands::Sample {
            session_id,
            limit,
            json,
        } => sample::run(session_id, limit, json),
        Commands::Sessions { limit, json } => sessions::run(limit, json),
        Commands::Logs {
            limit,
            errors,
            json,
        } => logs::run(limit, errors, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
