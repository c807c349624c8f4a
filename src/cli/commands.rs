use crate::config::{load_config, ServerConfig};
use crate::router::RouteTable;
use crate::server::HttpServer;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

/// Command-line interface for rexroute
#[derive(Parser)]
#[command(name = "rexroute")]
#[command(about = "Regex path-parameter router", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the configured routes
    Serve {
        /// Path to the TOML route configuration (built-in routes if omitted)
        #[arg(short, long, env = "REXROUTE_CONFIG")]
        config: Option<PathBuf>,

        /// Address and port to bind, overriding `bind_address`
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print route tables in precedence order
    Routes {
        /// Path to the TOML route configuration (built-in routes if omitted)
        #[arg(short, long, env = "REXROUTE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Compile every configured pattern without serving
    Check {
        /// Path to the TOML route configuration (built-in routes if omitted)
        #[arg(short, long, env = "REXROUTE_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Execute a parsed CLI command
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be read, parsed or validated
/// - A route pattern fails to compile
/// - The server fails to bind or its coroutine panics
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { config, addr } => {
            let config = config_or_default(config.as_deref())?;
            let service = config
                .build_service()
                .context("Failed to build route tables")?;
            let addr = addr.unwrap_or_else(|| config.bind_address.clone());
            let handle = HttpServer(service)
                .start(addr.as_str())
                .with_context(|| format!("Failed to bind {addr}"))?;
            info!(address = %handle.addr(), "Serving routes");
            handle
                .join()
                .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
        }
        Commands::Routes { config } => {
            let config = config_or_default(config.as_deref())?;
            let tables = config
                .build_tables()
                .context("Failed to build route tables")?;
            for table in &tables {
                table.dump_routes();
            }
            Ok(())
        }
        Commands::Check { config } => {
            let config = config_or_default(config.as_deref())?;
            let tables = config
                .build_tables()
                .context("Failed to build route tables")?;
            let patterns: usize = tables.iter().map(RouteTable::len).sum();
            println!(
                "ok: {} pattern(s) under {} prefix(es)",
                patterns,
                tables.len()
            );
            Ok(())
        }
    }
}

fn config_or_default(path: Option<&Path>) -> Result<ServerConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ServerConfig::default()),
    }
}
