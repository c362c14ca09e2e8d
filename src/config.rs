//! Command-line entry point and the run configuration loaded from it (§6).

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::delay::Strategy;
use crate::error::SimError;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArgs {
    /// Path to the run's YAML configuration file.
    #[arg(long, short)]
    pub config_path: String,
}

impl CommandLineArgs {
    pub fn new_with_path(path: impl ToString) -> Self {
        CommandLineArgs {
            config_path: path.to_string(),
        }
    }
}

/// The three delay-strategy codes (§6: `NO_WAIT`=0, `WAIT_TIME`=1, `WAIT`=2),
/// read from and written to the plain integer wire representation the
/// original system uses for this field (`strToInt`/`putProperty` on
/// `delay_strategy`), the same convention its neighboring `sp_algo` and
/// `distribution_method` fields already follow in this `Config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum DelayStrategyConfig {
    NoWait,
    WaitTime,
    Wait,
}

impl TryFrom<u8> for DelayStrategyConfig {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DelayStrategyConfig::NoWait),
            1 => Ok(DelayStrategyConfig::WaitTime),
            2 => Ok(DelayStrategyConfig::Wait),
            other => Err(format!("unknown delay_strategy code {other}")),
        }
    }
}

impl DelayStrategyConfig {
    pub fn to_strategy(self, wait_time_threshold: u32) -> Strategy {
        match self {
            DelayStrategyConfig::NoWait => Strategy::NoWait,
            DelayStrategyConfig::WaitTime => Strategy::WaitTime {
                threshold: wait_time_threshold,
            },
            DelayStrategyConfig::Wait => Strategy::Wait,
        }
    }

    /// The result row's `delay_strategy` column (§6): the same integer code
    /// the config file accepts.
    pub fn code(self) -> u8 {
        match self {
            DelayStrategyConfig::NoWait => 0,
            DelayStrategyConfig::WaitTime => 1,
            DelayStrategyConfig::Wait => 2,
        }
    }
}

fn default_wait_time_threshold() -> u32 {
    Strategy::DEFAULT_WAIT_TIME_THRESHOLD
}

fn default_debug_level() -> u8 {
    1
}

fn default_sp_algo() -> u8 {
    0
}

fn default_distribution_method() -> u8 {
    0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

/// The nine named run options (§6), deserialized from YAML, plus
/// `output_dir` — an ambient addition (§9 "ambient stack") for where the log
/// file and result row land; the distilled spec is silent on it since
/// result emission was out of its core scope.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub stop_at: u32,
    pub delay_strategy: DelayStrategyConfig,
    #[serde(default = "default_wait_time_threshold")]
    pub wait_time_threshold: u32,
    #[serde(default = "default_debug_level")]
    pub debug_level: u8,
    pub offline_passenger_share: f64,
    pub random_seed: u64,
    /// `0` = runtime Dijkstra on the expanded EAN, `1` = periodic-precomputed
    /// Dijkstra used historically for initial assignment only (§6). This
    /// crate owns only the runtime router, so `1` is accepted and silently
    /// falls back to it (see `assignment::assign_from_od`, DESIGN.md).
    #[serde(default = "default_sp_algo")]
    pub sp_algo: u8,
    /// `0` = first-OD-first-rank, `1` = greedy-by-weight-round-robin (§6).
    /// Stored for forward compatibility with a multi-rank driver; unused by
    /// this crate's single-rank `controller::run`.
    #[serde(default = "default_distribution_method")]
    pub distribution_method: u8,
    pub stranded_penalty: f64,
    pub data_folder_location: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_file(args: &CommandLineArgs) -> Result<Self, SimError> {
        let file = File::open(&args.config_path).map_err(|e| SimError::InvalidInputFile {
            path: args.config_path.clone(),
            reason: e.to_string(),
        })?;
        let config: Config =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|e| SimError::InvalidInputFile {
                path: args.config_path.clone(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.offline_passenger_share) {
            return Err(SimError::UnknownConfig(format!(
                "offline_passenger_share must be in [0, 1], got {}",
                self.offline_passenger_share
            )));
        }
        if self.debug_level > 3 {
            return Err(SimError::UnknownConfig(format!(
                "debug_level must be 0..=3, got {}",
                self.debug_level
            )));
        }
        Ok(())
    }

    pub fn strategy(&self) -> Strategy {
        self.delay_strategy.to_strategy(self.wait_time_threshold)
    }
}
