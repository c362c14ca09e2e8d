//! Aggregate metrics emitted at the end of a run (§4.7).

use crate::ean::Ean;
use crate::passenger::PassengerPool;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    pub total_travel_time: f64,
    pub stranded_passengers: u32,
}

/// Sums `arrival_time − departure_time` over non-stranded passengers and
/// counts the stranded ones (§4.7).
pub fn evaluate(passengers: &PassengerPool, ean: &Ean) -> EvaluationResult {
    let mut total_travel_time = 0.0;
    let mut stranded_passengers = 0;

    for p in passengers.iter() {
        if p.stranded {
            stranded_passengers += 1;
        } else {
            let travel_time = p.path.arrival_time(ean) as f64 - p.path.departure_time(ean) as f64;
            total_travel_time += travel_time;
        }
    }

    EvaluationResult {
        total_travel_time,
        stranded_passengers,
    }
}
