//! A passenger's plan: an ordered activity sequence with a current
//! position.

use crate::ean::{ActivityHandle, Ean, EventHandle};
use crate::error::SimError;

#[derive(Debug, Clone)]
pub struct Path {
    activities: Vec<ActivityHandle>,
    current_index: usize,
}

impl Path {
    /// Builds a path directly from an already-resolved activity sequence.
    /// `activities` must be non-empty and each activity's target must equal
    /// the next activity's source — callers that don't already have
    /// resolved activities should use [`Path::from_event_ids`] instead.
    pub fn new(activities: Vec<ActivityHandle>) -> Result<Self, SimError> {
        if activities.is_empty() {
            return Err(SimError::InvalidPath("path has no activities".into()));
        }
        Ok(Path {
            activities,
            current_index: 0,
        })
    }

    /// Walks adjacent event-id pairs, looking up the connecting activity in
    /// `ean`. If absent and the two events share a station and are
    /// time-ordered strictly increasing, a new `wait` activity is
    /// materialized. Fails with `InvalidPath` otherwise.
    pub fn from_event_ids(ean: &mut Ean, event_ids: &[u64]) -> Result<Self, SimError> {
        if event_ids.len() < 2 {
            return Err(SimError::InvalidPath(
                "path needs at least two events".into(),
            ));
        }
        let mut activities = Vec::with_capacity(event_ids.len() - 1);
        for pair in event_ids.windows(2) {
            let src = ean.lookup_event_by_id(pair[0]).ok_or_else(|| {
                SimError::InvalidPath(format!("unknown event id {}", pair[0]))
            })?;
            let tgt = ean.lookup_event_by_id(pair[1]).ok_or_else(|| {
                SimError::InvalidPath(format!("unknown event id {}", pair[1]))
            })?;
            let activity = match ean.lookup_activity_by_endpoints(src, tgt) {
                Some(a) => a,
                None => ean.materialize_wait(src, tgt)?,
            };
            activities.push(activity);
        }
        Path::new(activities)
    }

    pub fn activities(&self) -> &[ActivityHandle] {
        &self.activities
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_activity(&self) -> ActivityHandle {
        self.activities[self.current_index]
    }

    pub fn first(&self) -> ActivityHandle {
        self.activities[0]
    }

    pub fn on_last(&self) -> bool {
        self.current_index + 1 == self.activities.len()
    }

    /// The derived event sequence (§3): the first activity's source,
    /// followed by every activity's target.
    pub fn events(&self, ean: &Ean) -> Vec<EventHandle> {
        let mut events = Vec::with_capacity(self.activities.len() + 1);
        events.push(ean.activity(self.activities[0]).source);
        events.extend(self.activities.iter().map(|&a| ean.activity(a).target));
        events
    }

    /// Advances `current_index` and returns the new current activity.
    /// Panics if already on the last activity — callers must check
    /// `on_last()` first (this mirrors `InvariantViolation`: advancing past
    /// the end of a path is a bug, not a recoverable condition).
    pub fn next(&mut self) -> ActivityHandle {
        assert!(!self.on_last(), "Path::next called past the last activity");
        self.current_index += 1;
        self.current_activity()
    }

    pub fn prepend(&mut self, a: ActivityHandle) {
        self.activities.insert(0, a);
        self.current_index += 1;
    }

    pub fn append(&mut self, a: ActivityHandle) {
        self.activities.push(a);
    }

    pub fn has_any(&self, ean: &Ean, events: &[EventHandle]) -> bool {
        self.activities.iter().any(|&a| {
            let act = ean.activity(a);
            events.contains(&act.source) || events.contains(&act.target)
        })
    }

    /// Replaces the subpath strictly after `current_index` with the
    /// activities of `new_suffix`. The caller is responsible for ensuring
    /// `new_suffix` starts where the current activity leaves off.
    pub fn splice_tail(&mut self, new_suffix: Path) {
        self.activities.truncate(self.current_index + 1);
        self.activities.extend(new_suffix.activities);
    }

    pub fn arrival_time(&self, ean: &Ean) -> u32 {
        let last = *self.activities.last().expect("path is never empty");
        ean.event(ean.activity(last).target).time
    }

    pub fn departure_time(&self, ean: &Ean) -> u32 {
        ean.event(ean.activity(self.first()).source).time
    }
}
