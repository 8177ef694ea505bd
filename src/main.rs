use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nichepulse::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "nichepulse",
    version,
    about = "AI-assisted YouTube niche analysis dashboard",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML config file; environment variables are used when absent
    #[arg(short, long, global = true, env = "NICHEPULSE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard server
    Serve {
        /// Bind address, e.g. 0.0.0.0:5000
        #[arg(short, long)]
        bind: Option<String>,

        /// Directory holding the built front end
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Run one analysis refresh and print the result
    Analyze {
        /// Pretty-print the JSON output
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Export the niche table as CSV
    Export {
        /// Sort key (trending, growth, competition, revenue); store order when absent
        #[arg(short, long)]
        sort: Option<String>,

        /// Output file; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Snapshot file to read instead of the configured one
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());

    setup_tracing(&log_format, cli.verbose, &config.logging.level)?;

    match cli.command {
        Commands::Serve { bind, static_dir } => {
            tracing::info!(bind = ?bind, static_dir = ?static_dir, "Starting serve command");
            commands::serve(config, bind, static_dir).await?;
        }

        Commands::Analyze { pretty } => {
            tracing::info!(pretty = %pretty, "Starting analyze command");
            commands::analyze(config, pretty).await?;
        }

        Commands::Export {
            sort,
            output,
            snapshot,
        } => {
            tracing::info!(
                sort = ?sort,
                output = ?output,
                snapshot = ?snapshot,
                "Starting export command"
            );
            commands::export(config, sort.as_deref(), output, snapshot).await?;
        }

        Commands::Config => commands::show_config(&config)?,
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool, level: &str) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("nichepulse=debug,tower_http=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("nichepulse={level},tower_http={level},warn"))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
