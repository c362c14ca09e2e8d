//! Simulation driver (§4.6, §4.7): wires the EAN, delay manager, scheduler,
//! and passenger pool, and drives ticks to the stop horizon.

use tracing::{debug, info};

use std::collections::HashSet;

use crate::delay::{receive_delay, AlreadyDelayed, DelayMessage, Strategy};
use crate::distribution::{LocalPassengers, SingleRank, SyncBarrier};
use crate::ean::Ean;
use crate::evaluator::{evaluate, EvaluationResult};
use crate::passenger::PassengerPool;
use crate::scheduler::{sort_deterministically, DelayMap, TickScheduler};

pub struct Simulation {
    ean: Ean,
    passengers: PassengerPool,
    delay_map: DelayMap,
    scheduler: TickScheduler,
    strategy: Strategy,
    stop_horizon: u32,
    rank: SingleRank,
}

impl Simulation {
    pub fn new(ean: Ean, passengers: PassengerPool, strategy: Strategy, stop_horizon: u32) -> Self {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule_many(ean.event_handles().map(|h| ean.event(h).time));
        scheduler.schedule(stop_horizon.saturating_sub(1));

        Simulation {
            ean,
            passengers,
            delay_map: DelayMap::new(),
            scheduler,
            strategy,
            stop_horizon,
            rank: SingleRank,
        }
    }

    /// Registers a source delay; the reveal tick is the event's current time
    /// at registration (§3, "reveal tick").
    pub fn register_source_delay(&mut self, event: crate::ean::EventHandle, delay: u32) {
        let tick = self.ean.event(event).time;
        self.delay_map
            .insert_source(tick, DelayMessage::Source { event, delay });
        self.scheduler.schedule(tick);
    }

    /// Runs every scheduled tick below the stop horizon, then evaluates.
    pub fn run(mut self) -> EvaluationResult {
        while let Some(tick) = self.scheduler.next_tick(self.stop_horizon) {
            self.process_tick(tick);
            self.rank.sync();
        }
        let result = evaluate(&self.passengers, &self.ean);
        info!(
            total_travel_time = result.total_travel_time,
            stranded = result.stranded_passengers,
            "run complete"
        );
        result
    }

    fn process_tick(&mut self, tick: u32) {
        let local_ids: HashSet<u64> = (self.rank, &self.passengers)
            .local_passenger_ids()
            .into_iter()
            .collect();

        let mut messages = self.delay_map.take(tick);
        if !messages.is_empty() {
            sort_deterministically(&self.ean, &mut messages);
            for msg in messages {
                let mut already = AlreadyDelayed::new();
                let (delayed_events, new_ticks) = receive_delay(
                    &mut self.ean,
                    msg,
                    self.strategy,
                    &mut self.delay_map,
                    &mut already,
                );
                self.scheduler.schedule_many(new_ticks);
                debug!(tick, shifted = delayed_events.len(), "cascade processed");

                for id in &local_ids {
                    self.passengers
                        .get_mut(*id)
                        .choose_new_path(&mut self.ean, &delayed_events);
                }
            }
        }

        let due: Vec<_> = self
            .ean
            .event_handles()
            .filter(|&e| self.ean.event(e).time == tick)
            .collect();

        for e in due {
            let incoming: Vec<_> = self
                .ean
                .event(e)
                .incoming
                .iter()
                .copied()
                .filter(|&a| self.ean.activity(a).activity_type.is_traversable())
                .collect();
            for activity in incoming {
                let riders = self.ean.activity(activity).local_passengers.clone();
                for id in riders {
                    if local_ids.contains(&id) {
                        self.passengers.get_mut(id).advance(&mut self.ean);
                    }
                }
            }
        }
    }
}
