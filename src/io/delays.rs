//! Delay file loader (§6): `activity_id; delay_seconds`. The delayed event
//! is the target of that activity; if multiple entries target the same
//! event, the larger delay wins.

use std::path::Path;

use ahash::AHashMap;

use crate::ean::{Ean, EventHandle};
use crate::error::SimError;
use crate::io::read_data_lines;

fn parse_field<T: std::str::FromStr>(path: &Path, raw: &str, name: &str) -> Result<T, SimError> {
    raw.parse().map_err(|_| SimError::InvalidInputFile {
        path: path.display().to_string(),
        reason: format!("invalid {name}: {raw:?}"),
    })
}

/// Loads source delays, already deduplicated by target event (largest delay
/// wins), paired with the event's time at load — the reveal tick.
pub fn load_delays(path: &Path, ean: &Ean) -> Result<Vec<(EventHandle, u32)>, SimError> {
    let mut by_target: AHashMap<usize, u32> = AHashMap::default();

    for line in read_data_lines(path)? {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() != 2 {
            return Err(SimError::InvalidInputFile {
                path: path.display().to_string(),
                reason: format!("expected 2 fields, got {}: {line}", fields.len()),
            });
        }
        let activity_id: u64 = parse_field(path, fields[0], "activity_id")?;
        let delay_seconds: u32 = parse_field(path, fields[1], "delay_seconds")?;

        let activity = ean.lookup_activity_by_id(activity_id).ok_or_else(|| {
            SimError::InvalidInputFile {
                path: path.display().to_string(),
                reason: format!("unknown activity id {activity_id}"),
            }
        })?;
        let target = ean.activity(activity).target;

        by_target
            .entry(target.0)
            .and_modify(|d| *d = (*d).max(delay_seconds))
            .or_insert(delay_seconds);
    }

    Ok(by_target
        .into_iter()
        .map(|(idx, delay)| (EventHandle(idx), delay))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ean::ActivityType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn larger_duplicate_delay_wins() {
        let mut ean = Ean::new();
        let e1 = ean.add_event(1, 1, 0, 0.0);
        let e2 = ean.add_event(2, 2, 100, 0.0);
        let a = ean
            .add_activity(1, ActivityType::Drive, 90, 0.0, e1, e2)
            .unwrap();
        let _ = a;
        let file = file_with("1; 10\n1; 30\n");
        let delays = load_delays(file.path(), &ean).unwrap();
        assert_eq!(delays, vec![(e2, 30)]);
    }
}
