use clap::Parser;
use rexroute::cli::{run_cli, Cli};
use rexroute::logging::{init_logging_with_config, LogConfig};
use rexroute::runtime_config::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging_with_config(&LogConfig::from_env())?;
    RuntimeConfig::from_env().apply();

    run_cli(cli)
}
