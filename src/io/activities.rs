//! Expanded-activities file loader (§6):
//! `activity_id; ?; "type"; tail_event_id; head_event_id; lower_bound; weight`
//! — exactly 7 fields.

use std::path::Path;

use crate::ean::{ActivityType, Ean};
use crate::error::SimError;
use crate::io::read_data_lines;

fn parse_activity_type(path: &Path, raw: &str) -> Result<ActivityType, SimError> {
    match raw.trim_matches('"') {
        "drive" => Ok(ActivityType::Drive),
        "wait" => Ok(ActivityType::Wait),
        "change" => Ok(ActivityType::Change),
        "headway" => Ok(ActivityType::Headway),
        other => Err(SimError::InvalidInputFile {
            path: path.display().to_string(),
            reason: format!("unknown activity type {other:?}"),
        }),
    }
}

fn parse_field<T: std::str::FromStr>(path: &Path, raw: &str, name: &str) -> Result<T, SimError> {
    raw.parse().map_err(|_| SimError::InvalidInputFile {
        path: path.display().to_string(),
        reason: format!("invalid {name}: {raw:?}"),
    })
}

pub fn load_activities(path: &Path, ean: &mut Ean) -> Result<(), SimError> {
    for line in read_data_lines(path)? {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() != 7 {
            return Err(SimError::InvalidInputFile {
                path: path.display().to_string(),
                reason: format!("expected exactly 7 fields, got {}: {line}", fields.len()),
            });
        }

        let activity_id: u64 = parse_field(path, fields[0], "activity_id")?;
        let activity_type = parse_activity_type(path, fields[2])?;
        let tail_event_id: u64 = parse_field(path, fields[3], "tail_event_id")?;
        let head_event_id: u64 = parse_field(path, fields[4], "head_event_id")?;
        let lower_bound: u32 = parse_field(path, fields[5], "lower_bound")?;
        let weight: f64 = parse_field(path, fields[6], "weight")?;

        let source = ean.lookup_event_by_id(tail_event_id).ok_or_else(|| {
            SimError::InvalidInputFile {
                path: path.display().to_string(),
                reason: format!("unknown tail event id {tail_event_id}"),
            }
        })?;
        let target = ean.lookup_event_by_id(head_event_id).ok_or_else(|| {
            SimError::InvalidInputFile {
                path: path.display().to_string(),
                reason: format!("unknown head event id {head_event_id}"),
            }
        })?;

        ean.add_activity(activity_id, activity_type, lower_bound, weight, source, target)?;
    }
    Ok(())
}
