//! The time-expanded event-activity network (EAN).
//!
//! Events and activities live in two arenas owned by [`Ean`]; everything
//! else (adjacency, paths, passengers' `current_activity`) refers to them
//! only by the `Copy` handles [`EventHandle`] / [`ActivityHandle`]. This
//! keeps the graph free of reference-counting: ownership is the arena's,
//! handles are just indices.

use ahash::AHashMap;
use nohash_hasher::IntMap;

use crate::error::SimError;

/// Index into [`Ean::events`]. Stable for the lifetime of the `Ean` —
/// events are never removed, only reindexed in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventHandle(pub usize);

/// Index into [`Ean::activities`]. Stable even after `cut_change`: a cut
/// activity keeps its handle and its `source`/`target`, it is merely
/// unlinked from the adjacency lists so paths that already committed to it
/// keep a valid reference (see §5 resource discipline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActivityHandle(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Drive,
    Wait,
    Change,
    Headway,
}

impl ActivityType {
    pub fn is_traversable(self) -> bool {
        !matches!(self, ActivityType::Headway)
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    pub event_id: u64,
    pub station_id: u64,
    pub time: u32,
    pub weight: f64,
    pub outgoing: Vec<ActivityHandle>,
    pub incoming: Vec<ActivityHandle>,
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub activity_id: u64,
    pub activity_type: ActivityType,
    pub lower_bound: u32,
    pub weight: f64,
    pub source: EventHandle,
    pub target: EventHandle,
    /// Back-references to passengers currently traversing this edge. Not an
    /// ownership relation — passengers are owned by the passenger
    /// collection (see `PassengerRegistry`).
    pub local_passengers: Vec<u64>,
}

/// The event-activity network: two arenas plus the indices needed for O(1)
/// lookup by external id, by (station, time), and by endpoint pair.
#[derive(Debug, Default)]
pub struct Ean {
    events: Vec<Event>,
    activities: Vec<Activity>,
    event_id_index: IntMap<u64, EventHandle>,
    activity_id_index: IntMap<u64, ActivityHandle>,
    station_time_index: AHashMap<(u64, u32), EventHandle>,
    endpoint_index: AHashMap<(EventHandle, EventHandle), ActivityHandle>,
}

impl Ean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(&self, h: EventHandle) -> &Event {
        &self.events[h.0]
    }

    pub fn event_mut(&mut self, h: EventHandle) -> &mut Event {
        &mut self.events[h.0]
    }

    pub fn activity(&self, h: ActivityHandle) -> &Activity {
        &self.activities[h.0]
    }

    pub fn activity_mut(&mut self, h: ActivityHandle) -> &mut Activity {
        &mut self.activities[h.0]
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn event_handles(&self) -> impl Iterator<Item = EventHandle> {
        (0..self.events.len()).map(EventHandle)
    }

    /// Adds a new event to the network and indexes it by (station, time)
    /// and by its external id.
    pub fn add_event(
        &mut self,
        event_id: u64,
        station_id: u64,
        time: u32,
        weight: f64,
    ) -> EventHandle {
        let handle = EventHandle(self.events.len());
        self.events.push(Event {
            event_id,
            station_id,
            time,
            weight,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        self.event_id_index.insert(event_id, handle);
        self.station_time_index.insert((station_id, time), handle);
        handle
    }

    /// Wires a new activity between two existing events. Fails if an
    /// activity already exists between the same ordered endpoint pair.
    pub fn add_activity(
        &mut self,
        activity_id: u64,
        activity_type: ActivityType,
        lower_bound: u32,
        weight: f64,
        source: EventHandle,
        target: EventHandle,
    ) -> Result<ActivityHandle, SimError> {
        if self.endpoint_index.contains_key(&(source, target)) {
            return Err(SimError::InvariantViolation(format!(
                "activity already exists between events {} -> {}",
                self.event(source).event_id,
                self.event(target).event_id
            )));
        }
        let handle = ActivityHandle(self.activities.len());
        self.activities.push(Activity {
            activity_id,
            activity_type,
            lower_bound,
            weight,
            source,
            target,
            local_passengers: Vec::new(),
        });
        self.activity_id_index.insert(activity_id, handle);
        self.endpoint_index.insert((source, target), handle);
        self.event_mut(source).outgoing.push(handle);
        self.event_mut(target).incoming.push(handle);
        Ok(handle)
    }

    /// Removes `a` from `source.outgoing` and `target.incoming`. Idempotent:
    /// calling this twice on the same handle is a no-op the second time.
    pub fn cut_change(&mut self, a: ActivityHandle) {
        let (source, target) = {
            let act = self.activity(a);
            (act.source, act.target)
        };
        self.event_mut(source).outgoing.retain(|&h| h != a);
        self.event_mut(target).incoming.retain(|&h| h != a);
    }

    /// The only permitted mutator of `event.time`. Moves the (station, time)
    /// index entry atomically with the mutation.
    pub fn reindex_event_time(&mut self, e: EventHandle, new_time: u32) {
        let station_id = self.event(e).station_id;
        let old_time = self.event(e).time;
        self.station_time_index.remove(&(station_id, old_time));
        self.event_mut(e).time = new_time;
        self.station_time_index.insert((station_id, new_time), e);
    }

    pub fn lookup_event_by_station_time(&self, station: u64, time: u32) -> Option<EventHandle> {
        self.station_time_index.get(&(station, time)).copied()
    }

    pub fn lookup_event_by_id(&self, event_id: u64) -> Option<EventHandle> {
        self.event_id_index.get(&event_id).copied()
    }

    pub fn lookup_activity_by_id(&self, activity_id: u64) -> Option<ActivityHandle> {
        self.activity_id_index.get(&activity_id).copied()
    }

    pub fn lookup_activity_by_endpoints(
        &self,
        src: EventHandle,
        tgt: EventHandle,
    ) -> Option<ActivityHandle> {
        self.endpoint_index.get(&(src, tgt)).copied()
    }

    /// Materializes a `wait` activity between two events at the same
    /// station with `target.time > source.time`, used by `Path`
    /// construction when an intermediate wait edge is missing from the
    /// loaded network.
    pub fn materialize_wait(
        &mut self,
        source: EventHandle,
        target: EventHandle,
    ) -> Result<ActivityHandle, SimError> {
        if let Some(existing) = self.lookup_activity_by_endpoints(source, target) {
            return Ok(existing);
        }
        let (src_station, src_time) = {
            let e = self.event(source);
            (e.station_id, e.time)
        };
        let (tgt_station, tgt_time) = {
            let e = self.event(target);
            (e.station_id, e.time)
        };
        if src_station != tgt_station || tgt_time <= src_time {
            return Err(SimError::InvalidPath(format!(
                "cannot materialize wait edge between events {} and {}: stations {:?} vs {:?}, times {} -> {}",
                self.event(source).event_id,
                self.event(target).event_id,
                src_station,
                tgt_station,
                src_time,
                tgt_time
            )));
        }
        let activity_id = self.next_synthetic_activity_id();
        self.add_activity(
            activity_id,
            ActivityType::Wait,
            tgt_time - src_time,
            0.0,
            source,
            target,
        )
    }

    fn next_synthetic_activity_id(&self) -> u64 {
        // Synthetic ids live in a namespace above any id that could plausibly
        // come from an input file indexed from 1..=activities.len().
        self.activities.len() as u64 + 1_000_000_000
    }
}
