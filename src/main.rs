//! Solgraph CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "solgraph")]
#[command(about = "Dependency levels of Visual Studio solutions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to solgraph.toml next to the solution)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the projects of a solution, level by level
    Show {
        /// Path to the .sln file
        solution: PathBuf,

        /// Print the JSON report instead of text
        #[arg(long)]
        json: bool,
    },
    /// Report problems and exit non-zero if there are any
    Check {
        /// Path to the .sln file
        solution: PathBuf,
    },
    /// Serve the report and push updates when project files change
    Serve {
        /// Path to the .sln file
        solution: PathBuf,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Do not watch the solution for changes
        #[arg(long)]
        no_watch: bool,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("SOLGRAPH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("solgraph={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Show { solution, json } => {
            let config = Config::locate(cli.config.as_deref(), &solution)?;
            commands::show(&solution, &config, json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { solution } => {
            let config = Config::locate(cli.config.as_deref(), &solution)?;
            let clean = commands::check(&solution, &config).await?;
            Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Serve {
            solution,
            port,
            host,
            no_watch,
        } => {
            let mut config = Config::locate(cli.config.as_deref(), &solution)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if no_watch {
                config.watch.enabled = false;
            }
            commands::serve(solution, config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("Solgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}
