//! Runtime shortest-path search used for passenger rerouting.
//!
//! Event times in the EAN are absolute clock values, and an edge's cost is
//! defined as `target.time - source.time` (§4.3): the cost of any path from
//! a settled event to one of its neighbours is exactly that neighbour's own
//! (fixed) time, independent of which predecessor is used. Dijkstra over
//! this graph therefore degenerates into a time-ordered frontier expansion
//! that happens to also give us the standard shortest-path machinery (and
//! its termination argument) for free — so we keep the label-setting
//! structure rather than special-casing it away.

use keyed_priority_queue::KeyedPriorityQueue;
use nohash_hasher::IntMap;
use std::cmp::Ordering;

use crate::ean::{ActivityHandle, Ean, EventHandle};
use crate::error::SimError;
use crate::path::Path;

#[derive(Eq, PartialEq)]
struct ArrivalTime(u32);

impl Ord for ArrivalTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0).reverse()
    }
}

impl PartialOrd for ArrivalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Earliest-arrival search from `source` to any event at `target_station`,
/// traversing only non-headway activities. Returns `Unreachable` both when
/// the frontier drains without reaching the station, and in the degenerate
/// case where `source` is already at `target_station`: no non-empty `Path`
/// can represent "stay put", so that case is surfaced as `Unreachable`
/// rather than as an `InvalidPath` construction failure.
pub fn shortest_earliest_arrival(
    ean: &Ean,
    source: EventHandle,
    target_station: u64,
) -> Result<Path, SimError> {
    let mut queue: KeyedPriorityQueue<EventHandle, ArrivalTime> = KeyedPriorityQueue::new();
    let mut settled: IntMap<usize, bool> = IntMap::default();
    let mut predecessor: IntMap<usize, EventHandle> = IntMap::default();

    queue.push(source, ArrivalTime(ean.event(source).time));

    while let Some((current, ArrivalTime(_))) = queue.pop() {
        if settled.contains_key(&current.0) {
            continue;
        }
        settled.insert(current.0, true);

        let station = ean.event(current).station_id;
        if station == target_station {
            if current == source {
                // Already at the target station: there is no non-empty
                // `Path` to represent "stay put", so this degenerates to
                // the same outcome as an exhausted frontier.
                return Err(SimError::Unreachable {
                    from_event: ean.event(source).event_id,
                    target_station,
                });
            }
            return reconstruct_path(ean, source, current, &predecessor);
        }

        for &activity in &ean.event(current).outgoing {
            let act = ean.activity(activity);
            if !act.activity_type.is_traversable() {
                continue;
            }
            let neighbour = act.target;
            if settled.contains_key(&neighbour.0) {
                continue;
            }
            if !predecessor.contains_key(&neighbour.0) {
                predecessor.insert(neighbour.0, current);
                queue.push(neighbour, ArrivalTime(ean.event(neighbour).time));
            }
        }
    }

    Err(SimError::Unreachable {
        from_event: ean.event(source).event_id,
        target_station,
    })
}

fn reconstruct_path(
    ean: &Ean,
    source: EventHandle,
    target: EventHandle,
    predecessor: &IntMap<usize, EventHandle>,
) -> Result<Path, SimError> {
    let mut activities: Vec<ActivityHandle> = Vec::new();
    let mut current = target;
    while current != source {
        let pred = *predecessor.get(&current.0).ok_or_else(|| {
            SimError::InvariantViolation(format!(
                "no predecessor recorded for event {} during path reconstruction",
                ean.event(current).event_id
            ))
        })?;
        // Among `current.incoming`, pick the first activity whose source
        // equals the stored predecessor (§4.3).
        let activity = ean
            .event(current)
            .incoming
            .iter()
            .copied()
            .find(|&a| ean.activity(a).source == pred)
            .ok_or_else(|| {
                SimError::InvariantViolation(format!(
                    "predecessor {:?} of event {} has no matching incoming activity",
                    pred,
                    ean.event(current).event_id
                ))
            })?;
        activities.push(activity);
        current = pred;
    }
    activities.reverse();
    Path::new(activities)
}
