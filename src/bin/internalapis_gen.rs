use clap::Parser;
use internalapis::cli::{run_cli, Cli};
use internalapis::logging::{init_logging, LogConfig};
use tracing::error;

fn main() {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.verbose();
    }
    if let Err(err) = init_logging(&log_config) {
        eprintln!("Warning: {err:#}");
    }

    if let Err(err) = run_cli(cli) {
        error!(error = %format!("{err:#}"), "internalapis-gen failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
