//! End-to-end reproductions of the driver-level concrete scenarios.
//!
//! These exercise the full `Ean` + `Simulation` wiring rather than a single
//! component in isolation (the per-component unit tests already cover the
//! algorithmic detail of each scenario).

use transit_delay_sim::delay::Strategy;
use transit_delay_sim::driver::Simulation;
use transit_delay_sim::ean::{ActivityType, Ean};
use transit_delay_sim::passenger::{PassengerPool, Persona};
use transit_delay_sim::path::Path;

#[test]
fn simple_propagation_no_change() {
    let mut ean = Ean::new();
    let e1 = ean.add_event(1, 1, 0, 0.0);
    let e2 = ean.add_event(2, 2, 100, 0.0);
    let e3 = ean.add_event(3, 3, 200, 0.0);
    let a1 = ean.add_activity(1, ActivityType::Drive, 90, 0.0, e1, e2).unwrap();
    let a2 = ean.add_activity(2, ActivityType::Drive, 90, 0.0, e2, e3).unwrap();

    let mut pool = PassengerPool::new();
    pool.spawn(Path::new(vec![a1, a2]).unwrap(), 3, Persona::Online);

    let mut sim = Simulation::new(ean, pool, Strategy::Wait, 300);
    sim.register_source_delay(e2, 30);
    let result = sim.run();

    assert_eq!(result.stranded_passengers, 0);
    assert_eq!(result.total_travel_time, 220.0);
}

#[test]
fn headway_cycle_guard_does_not_hang_a_run() {
    let mut ean = Ean::new();
    let e1 = ean.add_event(1, 1, 50, 0.0);
    let e2 = ean.add_event(2, 1, 60, 0.0);
    ean.add_activity(1, ActivityType::Headway, 5, 0.0, e1, e2).unwrap();
    ean.add_activity(2, ActivityType::Headway, 5, 0.0, e2, e1).unwrap();

    let pool = PassengerPool::new();
    let mut sim = Simulation::new(ean, pool, Strategy::Wait, 200);
    sim.register_source_delay(e1, 20);
    // terminating at all demonstrates the cycle guard prevented infinite
    // re-propagation around the headway pair.
    let result = sim.run();
    assert_eq!(result.stranded_passengers, 0);
}

#[test]
fn no_wait_strands_a_passenger_with_no_alternative() {
    let mut ean = Ean::new();
    let e1 = ean.add_event(1, 1, 0, 0.0);
    let e2 = ean.add_event(2, 2, 100, 0.0);
    let e3 = ean.add_event(3, 2, 110, 0.0);
    let e4 = ean.add_event(4, 3, 200, 0.0);
    let a1 = ean.add_activity(1, ActivityType::Drive, 90, 0.0, e1, e2).unwrap();
    let change = ean.add_activity(2, ActivityType::Change, 5, 0.0, e2, e3).unwrap();
    let a3 = ean.add_activity(3, ActivityType::Drive, 90, 0.0, e3, e4).unwrap();

    let mut pool = PassengerPool::new();
    pool.spawn(Path::new(vec![a1, change, a3]).unwrap(), 3, Persona::Offline);

    let mut sim = Simulation::new(ean, pool, Strategy::NoWait, 300);
    sim.register_source_delay(e2, 20);
    let result = sim.run();

    // no alternative drive/change exists from e2 to station 3: stranded
    assert_eq!(result.stranded_passengers, 1);
}

#[test]
fn wait_time_boundary_keeps_change_under_threshold() {
    let mut ean = Ean::new();
    let e1 = ean.add_event(1, 1, 0, 0.0);
    let e2 = ean.add_event(2, 2, 100, 0.0);
    let e3 = ean.add_event(3, 2, 110, 0.0);
    let a1 = ean.add_activity(1, ActivityType::Drive, 90, 0.0, e1, e2).unwrap();
    let change = ean.add_activity(2, ActivityType::Change, 5, 0.0, e2, e3).unwrap();

    let mut pool = PassengerPool::new();
    pool.spawn(Path::new(vec![a1, change]).unwrap(), 2, Persona::Offline);

    let mut sim = Simulation::new(ean, pool, Strategy::WaitTime { threshold: 120 }, 300);
    sim.register_source_delay(e2, 20);
    let result = sim.run();

    assert_eq!(result.stranded_passengers, 0);
    // e2 arrives at 120, change shifts e3 from 110 to 125 (slack 5 absorbs 5 of 20)
    assert_eq!(result.total_travel_time, 125.0);
}

#[test]
fn online_passenger_reroutes_around_a_cut_change() {
    let mut ean = Ean::new();
    let e1 = ean.add_event(1, 1, 0, 0.0);
    let e2 = ean.add_event(2, 2, 100, 0.0);
    let e3 = ean.add_event(3, 2, 110, 0.0);
    let e4 = ean.add_event(4, 3, 200, 0.0);
    // an alternative drive directly from e2 to the target station
    let e5 = ean.add_event(5, 3, 250, 0.0);
    let a1 = ean.add_activity(1, ActivityType::Drive, 90, 0.0, e1, e2).unwrap();
    let change = ean.add_activity(2, ActivityType::Change, 5, 0.0, e2, e3).unwrap();
    ean.add_activity(3, ActivityType::Drive, 90, 0.0, e3, e4).unwrap();
    ean.add_activity(4, ActivityType::Drive, 10, 0.0, e2, e5).unwrap();

    let mut pool = PassengerPool::new();
    let path = Path::new(vec![a1, change]).unwrap();
    pool.spawn(path, 3, Persona::Online);

    let mut sim = Simulation::new(ean, pool, Strategy::NoWait, 400);
    sim.register_source_delay(e2, 20);
    let result = sim.run();

    // the cut change left no route via e3, but the direct drive to e5 works
    assert_eq!(result.stranded_passengers, 0);
    assert_eq!(result.total_travel_time, 250.0);
}

#[test]
fn source_delay_reveal_relocates_when_its_event_is_shifted_first() {
    // A trigger event (station 1) feeds into e5 alongside the passenger's
    // own boarding edge (station 3), so e5 gets delayed by the trigger's
    // cascade before the tick at e5's original reveal time (300) is ever
    // reached. A second source delay registered directly on e5 (reveal
    // tick 300) must follow e5's relocation to tick 340 rather than
    // firing, or being silently lost, at 300. The passenger's own
    // boarding event is untouched by the trigger's cascade, so its
    // departure time stays fixed while its arrival absorbs both delays.
    let mut ean = Ean::new();
    let trigger = ean.add_event(1, 1, 250, 0.0);
    let boarding = ean.add_event(2, 3, 200, 0.0);
    let e5 = ean.add_event(3, 2, 300, 0.0);
    let e6 = ean.add_event(4, 4, 400, 0.0);
    let a_trigger = ean
        .add_activity(1, ActivityType::Drive, 50, 0.0, trigger, e5)
        .unwrap();
    let a_board = ean
        .add_activity(2, ActivityType::Drive, 90, 0.0, boarding, e5)
        .unwrap();
    let a_continue = ean
        .add_activity(3, ActivityType::Drive, 50, 0.0, e5, e6)
        .unwrap();
    let _ = a_trigger;

    let mut pool = PassengerPool::new();
    pool.spawn(Path::new(vec![a_board, a_continue]).unwrap(), 4, Persona::Online);

    let mut sim = Simulation::new(ean, pool, Strategy::Wait, 2000);
    sim.register_source_delay(trigger, 40); // trigger: 250 -> 290, propagates +40 to e5 -> 340
    sim.register_source_delay(e5, 1000); // reveal tick 300, must relocate to 340

    let result = sim.run();
    assert_eq!(result.stranded_passengers, 0);
    // e5 ends up at 340 + 1000 = 1340, then propagates to e6 (slack
    // 400-340-50=10, propagated 990) -> e6 = 1390. The passenger's
    // boarding event never moves, so travel time is 1390 - 200 = 1190.
    assert_eq!(result.total_travel_time, 1190.0);
}
