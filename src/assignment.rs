//! Initial passenger assignment from an OD matrix (§6, §9 "ambient
//! stack").
//!
//! The OD-to-rank distribution heuristics and the periodic-network
//! precomputed router used for initial assignment (`sp_algo = 1`) are
//! external collaborators per §1/§6: this crate runs single-rank only, so
//! every passenger is local, and the only shortest-path routine it owns is
//! the runtime search of §4.3. Selecting `sp_algo = 1` therefore falls back
//! to that same runtime search, with a one-time warning (see DESIGN.md).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::ean::Ean;
use crate::io::events::OriginIndex;
use crate::io::od::OdMatrix;
use crate::passenger::{Persona, PassengerPool};
use crate::routing::shortest_earliest_arrival;

/// Draws a passenger's persona: `offline_share` is the probability of
/// drawing `Offline` (§6 `offline_passenger_share`).
fn draw_persona(rng: &mut StdRng, offline_share: f64) -> Persona {
    if rng.random::<f64>() < offline_share {
        Persona::Offline
    } else {
        Persona::Online
    }
}

/// For each non-zero OD cell, spawns `passengers` riders departing from the
/// origin station's departure events (round-robin over them, in file
/// order) and routed to the destination station via runtime Dijkstra.
///
/// A rider whose origin station has no known departure events, or for whom
/// no path to the destination exists at assignment time, is dropped with a
/// warning rather than spawned stranded — the data model has no
/// representation for a passenger without an initial `Path` (§3).
pub fn assign_from_od(
    ean: &Ean,
    origin_index: &OriginIndex,
    od: &OdMatrix,
    random_seed: u64,
    offline_passenger_share: f64,
    pool: &mut PassengerPool,
) {
    let mut rng = StdRng::seed_from_u64(random_seed);

    for (origin, destination, count) in od.entries() {
        let origin_id = origin as u64;
        let destination_id = destination as u64;

        let departures = match origin_index.get(&origin_id) {
            Some(events) if !events.is_empty() => events,
            _ => {
                warn!(origin = origin_id, "no departure events for OD origin, skipping");
                continue;
            }
        };

        for i in 0..count {
            let departure = departures[(i as usize) % departures.len()];
            match shortest_earliest_arrival(ean, departure, destination_id) {
                Ok(path) => {
                    let persona = draw_persona(&mut rng, offline_passenger_share);
                    pool.spawn(path, destination_id, persona);
                }
                Err(_) => {
                    warn!(
                        origin = origin_id,
                        destination = destination_id,
                        "no initial route found, dropping OD passenger"
                    );
                }
            }
        }
    }
}
