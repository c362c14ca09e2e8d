//! The tick-driven scheduler (§4.6) and the pending source-delay reveal map
//! it shares with the Delay Manager.

use ahash::AHashMap;
use std::collections::BTreeSet;

use crate::delay::DelayMessage;
use crate::ean::{Ean, EventHandle};

/// Pending `Source` delay reveals, keyed by the tick at which they become
/// known (which equals their target event's *current* time — relocated
/// whenever an earlier cascade shifts that event, see §4.4 step 4).
#[derive(Debug, Default)]
pub struct DelayMap {
    per_tick: AHashMap<u32, Vec<DelayMessage>>,
}

impl DelayMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_source(&mut self, tick: u32, msg: DelayMessage) {
        debug_assert!(msg.is_source());
        self.per_tick.entry(tick).or_default().push(msg);
    }

    /// Removes and returns all messages pending at `tick` (possibly empty).
    pub fn take(&mut self, tick: u32) -> Vec<DelayMessage> {
        self.per_tick.remove(&tick).unwrap_or_default()
    }

    pub fn is_empty_at(&self, tick: u32) -> bool {
        self.per_tick.get(&tick).map(|v| v.is_empty()).unwrap_or(true)
    }

    /// If `delay_map[old_tick]` holds a pending source message targeting
    /// `event`, moves it to `delay_map[new_tick]` and returns `new_tick` so
    /// the caller can schedule it. Returns `None` if no such message is
    /// pending (the common case).
    pub fn relocate_source_reveal(
        &mut self,
        event: EventHandle,
        old_tick: u32,
        new_tick: u32,
    ) -> Option<u32> {
        let bucket = self.per_tick.get_mut(&old_tick)?;
        let pos = bucket
            .iter()
            .position(|m| m.is_source() && m.event() == event)?;
        let msg = bucket.remove(pos);
        self.per_tick.entry(new_tick).or_default().push(msg);
        Some(new_tick)
    }
}

/// Sorts pending reveal messages by their target event's external id, per
/// the deterministic tie-break §9 adds to resolve the original's
/// map-iteration-order sensitivity.
pub fn sort_deterministically(ean: &Ean, messages: &mut [DelayMessage]) {
    messages.sort_by_key(|m| ean.event(m.event()).event_id);
}

/// An ordered set of tick times still to be processed, plus the set already
/// processed (processing an already-processed tick is a documented no-op,
/// §8 idempotence law).
#[derive(Debug, Default)]
pub struct TickScheduler {
    pending: BTreeSet<u32>,
    processed: BTreeSet<u32>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, tick: u32) {
        if !self.processed.contains(&tick) {
            self.pending.insert(tick);
        }
    }

    pub fn schedule_many(&mut self, ticks: impl IntoIterator<Item = u32>) {
        for t in ticks {
            self.schedule(t);
        }
    }

    /// Pops and returns the smallest pending tick strictly below
    /// `stop_horizon`, marking it processed. Returns `None` once no such
    /// tick remains, at which point the run is over.
    pub fn next_tick(&mut self, stop_horizon: u32) -> Option<u32> {
        let &t = self.pending.iter().next()?;
        if t >= stop_horizon {
            return None;
        }
        self.pending.remove(&t);
        self.processed.insert(t);
        Some(t)
    }

    pub fn is_processed(&self, tick: u32) -> bool {
        self.processed.contains(&tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reprocessing_a_tick_is_a_noop() {
        let mut sched = TickScheduler::new();
        sched.schedule(10);
        sched.schedule(20);
        assert_eq!(sched.next_tick(100), Some(10));
        // re-scheduling an already processed tick does not resurrect it
        sched.schedule(10);
        assert_eq!(sched.next_tick(100), Some(20));
        assert_eq!(sched.next_tick(100), None);
    }

    #[test]
    fn stops_before_horizon() {
        let mut sched = TickScheduler::new();
        sched.schedule(5);
        sched.schedule(99);
        assert_eq!(sched.next_tick(10), Some(5));
        // 99 is not below the horizon of 10
        assert_eq!(sched.next_tick(10), None);
    }

    #[test]
    fn relocate_moves_pending_source_between_buckets() {
        let mut ean = Ean::new();
        let e = ean.add_event(1, 1, 100, 0.0);
        let mut map = DelayMap::new();
        map.insert_source(100, DelayMessage::Source { event: e, delay: 10 });
        assert!(!map.is_empty_at(100));

        let moved = map.relocate_source_reveal(e, 100, 140);
        assert_eq!(moved, Some(140));
        assert!(map.is_empty_at(100));
        assert!(!map.is_empty_at(140));
    }
}
