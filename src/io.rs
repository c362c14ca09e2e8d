//! Semicolon-separated input loaders and the CSV result writer (§6).

pub mod activities;
pub mod delays;
pub mod events;
pub mod od;
pub mod result;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SimError;

/// Shared line reader for all semicolon-separated input files: strips `#`
/// comments and blank lines, trims surrounding whitespace from the
/// remainder.
fn read_data_lines(path: &Path) -> Result<Vec<String>, SimError> {
    let file = File::open(path).map_err(|e| SimError::InvalidInputFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| SimError::InvalidInputFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => &line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}
