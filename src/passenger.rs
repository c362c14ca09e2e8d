//! Passenger state and the two behaviors: advancing along activities as
//! time passes, and rerouting on observed network changes (§4.5).

use tracing::{debug, trace};

use crate::ean::{ActivityHandle, Ean, EventHandle};
use crate::error::SimError;
use crate::path::Path;
use crate::routing::shortest_earliest_arrival;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Online,
    Offline,
}

#[derive(Debug)]
pub struct Passenger {
    pub id: u64,
    pub path: Path,
    pub current_activity: ActivityHandle,
    pub target_station_id: u64,
    pub stranded: bool,
    pub persona: Persona,
}

impl Passenger {
    pub fn new(id: u64, path: Path, target_station_id: u64, persona: Persona) -> Self {
        let current_activity = path.current_activity();
        Passenger {
            id,
            path,
            current_activity,
            target_station_id,
            stranded: false,
            persona,
        }
    }

    /// Checks the invariant `current_activity == path.activities[current_index]`
    /// (§8), or that the passenger is stranded.
    pub fn check_invariant(&self) -> Result<(), SimError> {
        if self.stranded {
            return Ok(());
        }
        if self.current_activity == self.path.current_activity() {
            Ok(())
        } else {
            Err(SimError::InvariantViolation(format!(
                "passenger {} current_activity does not match path position",
                self.id
            )))
        }
    }

    /// Steps to the next activity on the path, updating `local_passengers`
    /// back-references on the old and new activity. A no-op once stranded.
    pub fn advance(&mut self, ean: &mut Ean) {
        if self.stranded {
            return;
        }
        let old = self.current_activity;
        ean.activity_mut(old).local_passengers.retain(|&p| p != self.id);

        if !self.path.on_last() {
            let next = self.path.next();
            self.current_activity = next;
            ean.activity_mut(next).local_passengers.push(self.id);
            trace!(passenger = self.id, activity = next.0, "advanced");
        } else {
            trace!(passenger = self.id, "reached target");
        }

        self.check_invariant()
            .expect("advance must leave current_activity aligned with the path position");
    }

    /// Reroutes on broken changes (`offline`) or any delayed event on the
    /// remaining path (`online`). `Unreachable` is absorbed by marking the
    /// passenger stranded rather than propagated.
    pub fn choose_new_path(&mut self, ean: &mut Ean, delayed_events: &[EventHandle]) {
        if self.stranded {
            return;
        }

        let activities = self.path.activities().to_vec();
        let remaining = &activities[self.path.current_index()..activities.len().saturating_sub(1)];

        let triggered = remaining.iter().any(|&a| {
            let act = ean.activity(a);
            match self.persona {
                Persona::Offline => {
                    act.activity_type == crate::ean::ActivityType::Change
                        && !ean.event(act.source).outgoing.contains(&a)
                }
                Persona::Online => delayed_events.contains(&act.target),
            }
        });

        if !triggered {
            return;
        }

        debug!(passenger = self.id, persona = ?self.persona, "reroute triggered");

        let from_event = ean.activity(self.current_activity).target;
        match shortest_earliest_arrival(ean, from_event, self.target_station_id) {
            Ok(new_suffix) => {
                self.path.splice_tail(new_suffix);
                self.check_invariant()
                    .expect("reroute must leave current_activity aligned with the path position");
            }
            Err(SimError::Unreachable { .. }) => {
                self.stranded = true;
                debug!(passenger = self.id, "stranded: no feasible reroute");
            }
            // Anything else (InvariantViolation) is a bug in graph
            // reconstruction, not a passenger-local condition (§7): it must
            // not be silently absorbed into `stranded`.
            Err(other) => panic!("reroute for passenger {} hit a fatal error: {other}", self.id),
        }
    }
}

/// Owns all passengers on this rank; a stand-in for the distribution
/// layer's local-passenger iterator (§5, §6: "Distribution interface").
#[derive(Debug, Default)]
pub struct PassengerPool {
    passengers: Vec<Passenger>,
}

impl PassengerPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, path: Path, target_station_id: u64, persona: Persona) -> u64 {
        let id = self.passengers.len() as u64;
        self.passengers.push(Passenger::new(id, path, target_station_id, persona));
        id
    }

    pub fn get(&self, id: u64) -> &Passenger {
        &self.passengers[id as usize]
    }

    pub fn get_mut(&mut self, id: u64) -> &mut Passenger {
        &mut self.passengers[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Passenger> {
        self.passengers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ean::ActivityType;

    fn linear_network() -> (Ean, Vec<ActivityHandle>) {
        let mut ean = Ean::new();
        let e1 = ean.add_event(1, 1, 0, 0.0);
        let e2 = ean.add_event(2, 2, 100, 0.0);
        let e3 = ean.add_event(3, 3, 200, 0.0);
        let a1 = ean
            .add_activity(1, ActivityType::Drive, 90, 0.0, e1, e2)
            .unwrap();
        let a2 = ean
            .add_activity(2, ActivityType::Drive, 90, 0.0, e2, e3)
            .unwrap();
        (ean, vec![a1, a2])
    }

    #[test]
    fn check_invariant_passes_when_current_activity_matches_path() {
        let (_ean, acts) = linear_network();
        let path = Path::new(acts.clone()).unwrap();
        let p = Passenger::new(0, path, 3, Persona::Online);
        assert!(p.check_invariant().is_ok());
    }

    #[test]
    fn check_invariant_fails_when_current_activity_diverges_from_path() {
        let (_ean, acts) = linear_network();
        let path = Path::new(acts.clone()).unwrap();
        let mut p = Passenger::new(0, path, 3, Persona::Online);
        p.current_activity = acts[1];
        let err = p.check_invariant().unwrap_err();
        assert!(matches!(err, SimError::InvariantViolation(_)));
    }

    #[test]
    fn check_invariant_passes_once_stranded_regardless_of_position() {
        let (_ean, acts) = linear_network();
        let path = Path::new(acts.clone()).unwrap();
        let mut p = Passenger::new(0, path, 3, Persona::Online);
        p.current_activity = acts[1];
        p.stranded = true;
        assert!(p.check_invariant().is_ok());
    }

    #[test]
    fn advance_moves_local_passengers_backreference() {
        let (mut ean, acts) = linear_network();
        let path = Path::new(acts.clone()).unwrap();
        let mut p = Passenger::new(0, path, 3, Persona::Online);
        ean.activity_mut(acts[0]).local_passengers.push(0);

        p.advance(&mut ean);

        assert!(ean.activity(acts[0]).local_passengers.is_empty());
        assert_eq!(ean.activity(acts[1]).local_passengers, vec![0]);
        assert_eq!(p.current_activity, acts[1]);
    }

    #[test]
    fn advance_on_last_activity_completes_without_panicking() {
        let (mut ean, acts) = linear_network();
        let path = Path::new(vec![acts[1]]).unwrap();
        let mut p = Passenger::new(0, path, 3, Persona::Online);
        ean.activity_mut(acts[1]).local_passengers.push(0);

        p.advance(&mut ean);
        assert!(ean.activity(acts[1]).local_passengers.is_empty());
        assert!(!p.stranded);
    }

    #[test]
    fn advance_is_a_noop_once_stranded() {
        let (mut ean, acts) = linear_network();
        let path = Path::new(acts.clone()).unwrap();
        let mut p = Passenger::new(0, path, 3, Persona::Online);
        p.stranded = true;
        let before = p.current_activity;
        p.advance(&mut ean);
        assert_eq!(p.current_activity, before);
    }

    #[test]
    fn online_persona_reroutes_on_any_delayed_event() {
        let (mut ean, acts) = linear_network();
        let path = Path::new(acts.clone()).unwrap();
        let mut p = Passenger::new(0, path, 3, Persona::Online);

        let e2 = ean.activity(acts[0]).target;
        p.choose_new_path(&mut ean, &[e2]);

        // same activities still form a valid route to station 3
        assert!(!p.stranded);
        assert_eq!(p.path.arrival_time(&ean), 200);
    }

    #[test]
    fn offline_persona_ignores_delay_without_cut_change() {
        let (mut ean, acts) = linear_network();
        let path = Path::new(acts.clone()).unwrap();
        let mut p = Passenger::new(0, path.clone(), 3, Persona::Offline);
        let before = p.path.activities().to_vec();

        let e2 = ean.activity(acts[0]).target;
        p.choose_new_path(&mut ean, &[e2]);

        assert_eq!(p.path.activities(), before.as_slice());
    }

    #[test]
    fn stranded_when_no_reroute_exists() {
        let mut ean = Ean::new();
        let e1 = ean.add_event(1, 1, 0, 0.0);
        let e2 = ean.add_event(2, 2, 100, 0.0);
        let change = ean
            .add_activity(1, ActivityType::Change, 5, 0.0, e1, e2)
            .unwrap();
        let e3 = ean.add_event(3, 3, 200, 0.0);
        let a2 = ean
            .add_activity(2, ActivityType::Drive, 90, 0.0, e2, e3)
            .unwrap();

        let path = Path::new(vec![change, a2]).unwrap();
        let mut p = Passenger::new(0, path, 3, Persona::Offline);
        ean.cut_change(change);

        p.choose_new_path(&mut ean, &[]);
        assert!(p.stranded);
    }
}
