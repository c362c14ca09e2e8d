//! Delay propagation (§4.4).
//!
//! `receive_delay` is specified as deep recursion in the original; we use an
//! explicit work queue instead (§9 design notes), preserving the specified
//! traversal order — outgoing activities of the event that was just
//! shifted — for deterministic cascades.

use nohash_hasher::IntSet;
use tracing::{debug, trace};

use crate::ean::{ActivityType, Ean, EventHandle};
use crate::scheduler::DelayMap;

/// The three delay-handling strategies a simulation run honors (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NoWait,
    /// Propagate through a `change` only if the propagated delay is at most
    /// `threshold` seconds; cut it otherwise.
    WaitTime { threshold: u32 },
    Wait,
}

impl Strategy {
    /// The fixed threshold (120s) used when `WAIT_TIME` is selected without
    /// an explicit override (§4.4).
    pub const DEFAULT_WAIT_TIME_THRESHOLD: u32 = 120;
}

#[derive(Debug, Clone, Copy)]
pub enum DelayMessage {
    Source { event: EventHandle, delay: u32 },
    Propagation { event: EventHandle, delay: u32 },
}

impl DelayMessage {
    pub fn event(&self) -> EventHandle {
        match self {
            DelayMessage::Source { event, .. } => *event,
            DelayMessage::Propagation { event, .. } => *event,
        }
    }

    fn delay(&self) -> u32 {
        match self {
            DelayMessage::Source { delay, .. } => *delay,
            DelayMessage::Propagation { delay, .. } => *delay,
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, DelayMessage::Source { .. })
    }
}

/// Events shifted so far within the current top-level cascade; a fresh,
/// empty instance must be created per reveal (§9) — never reused across
/// reveals or kept simulation-wide.
#[derive(Debug, Default)]
pub struct AlreadyDelayed {
    events: IntSet<usize>,
}

impl AlreadyDelayed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, e: EventHandle) -> bool {
        self.events.contains(&e.0)
    }

    fn insert(&mut self, e: EventHandle) {
        self.events.insert(e.0);
    }
}

/// The events this cascade's propagation reached, returned to the caller so
/// it can drive `choose_new_path` for the `online` persona (§4.5/§4.6). A
/// plain `Vec` over the handles touched, in discovery order.
pub type DelayedEvents = Vec<EventHandle>;

/// Ticks newly introduced by this cascade (new event times, and any
/// relocated source-reveal time) — the scheduler must learn about these.
pub type NewTicks = Vec<u32>;

/// Applies one delay message to the network, propagating derived delays to
/// downstream activities per `strategy`. Returns the events that were
/// actually shifted (for online rerouting) and the new tick values the
/// scheduler must register.
pub fn receive_delay(
    ean: &mut Ean,
    msg: DelayMessage,
    strategy: Strategy,
    delay_map: &mut DelayMap,
    already_delayed: &mut AlreadyDelayed,
) -> (DelayedEvents, NewTicks) {
    let mut delayed_events = DelayedEvents::new();
    let mut new_ticks = NewTicks::new();
    let mut work: Vec<DelayMessage> = vec![msg];

    while let Some(msg) = work.pop() {
        let e = msg.event();
        let d = msg.delay();
        let t0 = ean.event(e).time;
        let t1 = t0 + d;

        ean.reindex_event_time(e, t1);
        already_delayed.insert(e);
        delayed_events.push(e);
        new_ticks.push(t1);
        trace!(event = ean.event(e).event_id, old_time = t0, new_time = t1, "event delayed");

        if !msg.is_source() {
            if let Some(relocated) = delay_map.relocate_source_reveal(e, t0, t1) {
                debug!(
                    event = ean.event(e).event_id,
                    from = t0,
                    to = t1,
                    "relocated pending source-delay reveal"
                );
                new_ticks.push(relocated);
            }
        }

        let outgoing = ean.event(e).outgoing.clone();
        for activity in outgoing {
            let act = ean.activity(activity);
            let target = act.target;
            if already_delayed.contains(target) {
                continue;
            }
            let target_time = ean.event(target).time;
            let lower_bound = act.lower_bound;
            let activity_type = act.activity_type;

            let slack = (target_time as i64) - (t0 as i64) - (lower_bound as i64);
            if slack < 0 {
                // violated headway: not an error, just not propagated further
                continue;
            }
            let propagated = d as i64 - slack;
            if propagated <= 0 {
                continue;
            }
            let propagated = propagated as u32;

            let should_propagate = match activity_type {
                ActivityType::Change => match strategy {
                    Strategy::NoWait => {
                        ean.cut_change(activity);
                        false
                    }
                    Strategy::WaitTime { threshold } => {
                        if propagated <= threshold {
                            true
                        } else {
                            ean.cut_change(activity);
                            false
                        }
                    }
                    Strategy::Wait => true,
                },
                _ => true,
            };

            if should_propagate {
                work.push(DelayMessage::Propagation {
                    event: target,
                    delay: propagated,
                });
            }
        }
    }

    (delayed_events, new_ticks)
}
