//! The distribution interface (§5, §6): a narrow, rank-aware contract the
//! core consumes from an external multi-worker driver. Out of scope per
//! §1/§6 is everything that decides *how* passengers are partitioned or
//! marshalled across ranks — the core only needs (a) an iterator over
//! passengers local to this rank and (b) a sync barrier invoked between
//! tick handlers.

use crate::passenger::PassengerPool;

/// Yields the ids of passengers local to this rank. A single-rank run
/// yields every passenger in the pool.
pub trait LocalPassengers {
    fn local_passenger_ids(&self) -> Vec<u64>;
}

/// Invoked between tick handlers so that event-time mutations applied on
/// other ranks become visible locally before the next tick's passenger
/// advancement. A single-rank run has nothing to synchronize.
pub trait SyncBarrier {
    fn sync(&mut self);
}

/// The only distribution method this crate implements directly (§6
/// `distribution_method = 0`, "first-OD-first-rank" degenerates to this
/// when there is exactly one rank). Owns the whole passenger pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleRank;

impl LocalPassengers for (SingleRank, &PassengerPool) {
    fn local_passenger_ids(&self) -> Vec<u64> {
        self.1.iter().map(|p| p.id).collect()
    }
}

impl SyncBarrier for SingleRank {
    fn sync(&mut self) {}
}
