//! Verifier configuration tool
//!
//! Loads the cluster connection settings a verification run would use,
//! validates them, and prints what each cluster resolves to.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use verifier_logging::{init_logging, LogConfig};

mod cli;

#[derive(Parser, Debug)]
#[command(name = "verifier", about = "Cluster configuration tool for the query verifier")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate cluster connection settings
    Check {
        /// Properties or TOML file with cluster options
        #[arg(short, long)]
        config: PathBuf,

        /// Cluster namespace to check (repeatable)
        #[arg(long = "cluster", default_values = ["control", "test"])]
        clusters: Vec<String>,

        /// Prefix of environment variables that override file options
        #[arg(long, default_value = "VERIFIER")]
        env_prefix: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the default timeouts and parameters
    Defaults {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn wants_json(&self) -> bool {
        match self {
            Commands::Check { json, .. } | Commands::Defaults { json } => *json,
        }
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Check {
            config,
            clusters,
            env_prefix,
            json,
        } => cli::check::run(cli::check::CheckArgs {
            config,
            clusters,
            env_prefix,
            json,
        }),
        Commands::Defaults { json } => cli::defaults::run(json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(LogConfig {
        app_name: "verifier",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: {:#}", err);
    }

    let json_mode = cli.command.wants_json();
    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            if json_mode {
                cli::output::print_json_error(&err);
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::from(1)
        }
    }
}
