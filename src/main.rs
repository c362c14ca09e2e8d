use clap::Parser;
use tracing::{error, info};

use transit_delay_sim::config::{CommandLineArgs, Config};
use transit_delay_sim::controller;

fn main() {
    let args = CommandLineArgs::parse();
    let config = Config::from_file(&args).unwrap_or_else(|e| {
        eprintln!("failed to load config: {e}");
        std::process::exit(1);
    });

    std::fs::create_dir_all(&config.output_dir).unwrap_or_else(|e| {
        eprintln!("failed to create output dir {}: {e}", config.output_dir.display());
        std::process::exit(1);
    });
    let _logger_guard = transit_delay_sim::logging::init_logging(&config.output_dir, config.debug_level);
    info!("config loaded, starting run");

    match controller::run(&config) {
        Ok(row) => {
            info!(
                traveling_time = row.traveling_time,
                stranded = row.stranded_passengers,
                "run finished"
            );
        }
        Err(e) => {
            error!(error = %e, "run failed");
            std::process::exit(1);
        }
    }
}
