use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use localcode::{SetupError, commands};

#[derive(Parser)]
#[command(name = "localcode")]
#[command(about = "Bootstrap a local AI coding environment (Ollama + OpenCode)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, env = "LOCALCODE_CONFIG", global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install, start, pull, and configure everything that is missing
    Up {
        /// Model to pull and configure (overrides the config file)
        #[arg(short, long)]
        model: Option<String>,

        /// Seconds to wait for the service to become ready
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,

        /// Fail on missing tools instead of installing them
        #[arg(long)]
        no_install: bool,
    },

    /// Check every piece of the environment without changing anything
    Status,

    /// Pull a model into the local store
    Pull {
        /// Model to pull (defaults to the configured one)
        model: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Set a configuration value (e.g. `model`, `ollama.host`)
    Set { key: String, value: String },

    /// Print a single configuration value
    Get { key: String },

    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                // stdout stays machine-readable (`config get`, `config show --json`)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    info!("Starting localcode v{}", env!("CARGO_PKG_VERSION"));

    // Execute command
    let result = match cli.command {
        Commands::Up {
            model,
            timeout_secs,
            no_install,
        } => commands::up::execute(cli.config, model, timeout_secs, no_install).await,
        Commands::Status => commands::status::execute(cli.config).await,
        Commands::Pull { model } => commands::pull::execute(cli.config, model).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show { json } => commands::config::show::execute(cli.config, json).await,
            ConfigCommands::Set { key, value } => {
                commands::config::set::execute(cli.config, key, value).await
            }
            ConfigCommands::Get { key } => commands::config::get::execute(cli.config, key).await,
            ConfigCommands::Path => commands::config::path::execute(cli.config).await,
        },
    };

    if let Err(e) = result {
        eprintln!("{} {:?}", "Error:".red(), e);
        std::process::exit(exit_code(&e));
    }
}

/// A step that failed because an external command exited non-zero ends
/// the run with that command's exit status; everything else exits 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SetupError>())
        .map_or(1, |setup| match setup {
            SetupError::CommandFailed { code, .. } if *code > 0 => *code,
            _ => 1,
        })
}
