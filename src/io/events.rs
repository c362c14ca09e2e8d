//! Expanded-events file loader (§6): `event_id; "type"; ?; time; weight; station_id; …`.
//!
//! Only `"departure"` events are indexed into the origin→events map used by
//! initial passenger assignment; every event (departure or arrival) is
//! still added to the EAN.

use std::path::Path;

use ahash::AHashMap;

use crate::ean::{Ean, EventHandle};
use crate::error::SimError;
use crate::io::read_data_lines;

/// Maps a station id to the departure events loaded for it, in file order.
pub type OriginIndex = AHashMap<u64, Vec<EventHandle>>;

pub fn load_events(path: &Path, ean: &mut Ean) -> Result<OriginIndex, SimError> {
    let mut origin_index: OriginIndex = AHashMap::default();

    for line in read_data_lines(path)? {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() < 6 {
            return Err(SimError::InvalidInputFile {
                path: path.display().to_string(),
                reason: format!("expected at least 6 fields, got {}: {line}", fields.len()),
            });
        }

        let event_id: u64 = parse_field(path, fields[0], "event_id")?;
        let event_type = fields[1].trim_matches('"');
        let time: u32 = parse_field(path, fields[3], "time")?;
        let weight: f64 = parse_field(path, fields[4], "weight")?;
        let station_id: u64 = parse_field(path, fields[5], "station_id")?;

        let handle = ean.add_event(event_id, station_id, time, weight);
        if event_type == "departure" {
            origin_index.entry(station_id).or_default().push(handle);
        }
    }

    Ok(origin_index)
}

fn parse_field<T: std::str::FromStr>(path: &Path, raw: &str, name: &str) -> Result<T, SimError> {
    raw.parse().map_err(|_| SimError::InvalidInputFile {
        path: path.display().to_string(),
        reason: format!("invalid {name}: {raw:?}"),
    })
}
