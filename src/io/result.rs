//! Result row emission (§6): `stop_at; data_folder_location; debug_level;
//! delay_strategy; traveling_time; stranded_passengers`.

use std::path::Path;

use serde::Serialize;

use crate::error::SimError;

#[derive(Debug, Serialize)]
pub struct ResultRow {
    pub stop_at: u32,
    pub data_folder_location: String,
    pub debug_level: u8,
    /// The same integer code `delay_strategy` was read as (§6).
    pub delay_strategy: u8,
    pub traveling_time: f64,
    pub stranded_passengers: u32,
}

pub fn write_result(path: &Path, row: &ResultRow) -> Result<(), SimError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| SimError::InvalidInputFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    writer.serialize(row).map_err(|e| SimError::InvalidInputFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    writer.flush().map_err(|e| SimError::InvalidInputFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
