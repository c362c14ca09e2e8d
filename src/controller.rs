//! Top-level run orchestration (§2 "Simulation driver"): loads the network
//! and OD/delay files named by `Config`, assigns passengers, runs the
//! simulation to the configured stop horizon, and writes the result row.

use std::path::PathBuf;

use tracing::info;

use crate::assignment::assign_from_od;
use crate::config::Config;
use crate::driver::Simulation;
use crate::ean::Ean;
use crate::error::SimError;
use crate::io::activities::load_activities;
use crate::io::delays::load_delays;
use crate::io::events::load_events;
use crate::io::od::load_od_matrix;
use crate::io::result::{write_result, ResultRow};
use crate::passenger::PassengerPool;

/// Runs one simulation end to end and returns the result row that was
/// written to `output_dir/result.csv`.
pub fn run(config: &Config) -> Result<ResultRow, SimError> {
    let events_path = data_path(config, "events.csv");
    let activities_path = data_path(config, "activities.csv");
    let od_path = data_path(config, "od.csv");
    let delays_path = data_path(config, "delays.csv");

    let mut ean = Ean::new();
    let origin_index = load_events(&events_path, &mut ean)?;
    load_activities(&activities_path, &mut ean)?;
    info!(events = ean.event_count(), "network loaded");

    let od = load_od_matrix(&od_path)?;
    let mut passengers = PassengerPool::new();
    assign_from_od(
        &ean,
        &origin_index,
        &od,
        config.random_seed,
        config.offline_passenger_share,
        &mut passengers,
    );
    info!(passengers = passengers.len(), "passengers assigned");

    let delays = load_delays(&delays_path, &ean)?;

    let mut simulation = Simulation::new(ean, passengers, config.strategy(), config.stop_at);
    for (event, delay) in delays {
        simulation.register_source_delay(event, delay);
    }

    let result = simulation.run();

    let row = ResultRow {
        stop_at: config.stop_at,
        data_folder_location: config.data_folder_location.display().to_string(),
        debug_level: config.debug_level,
        delay_strategy: config.delay_strategy.code(),
        traveling_time: result.total_travel_time,
        stranded_passengers: result.stranded_passengers,
    };

    std::fs::create_dir_all(&config.output_dir).map_err(|e| SimError::InvalidInputFile {
        path: config.output_dir.display().to_string(),
        reason: e.to_string(),
    })?;
    let result_path = config.output_dir.join("result.csv");
    write_result(&result_path, &row)?;
    info!(path = %result_path.display(), "result written");

    Ok(row)
}

fn data_path(config: &Config, file_name: &str) -> PathBuf {
    config.data_folder_location.join(file_name)
}
