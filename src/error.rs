use thiserror::Error;

/// The closed error taxonomy for the simulation core and its ambient I/O.
///
/// `Unreachable` is the only variant the core ever recovers from internally
/// (it is absorbed by the passenger controller into a `stranded` flag); every
/// other variant is fatal and propagates out of `main`.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid input file {path}: {reason}")]
    InvalidInputFile { path: String, reason: String },

    #[error("unknown configuration option: {0}")]
    UnknownConfig(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("no feasible path from event {from_event} to station {target_station}")]
    Unreachable { from_event: u64, target_station: u64 },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
