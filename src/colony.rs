//! Colony aggregate and the discrete-event simulation loop

use std::collections::BTreeMap;

use serde::Serialize;

use crate::clock::Clock;
use crate::facility::{Facility, Inventory, Timestamp};
use crate::models::{PinId, Route};
use crate::report::{ColonyStatus, PinSnapshot};
use crate::route::RouteTable;
use crate::scheduler::EventQueue;

/// Upper bound on events handled by a single `simulate` call.
pub const DEFAULT_MAX_EVENTS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCondition {
    /// Stop at the first event that lies after the wall clock
    UntilNow,
    /// Run until no pin has anything left to do
    UntilWorkEnds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    QueueExhausted,
    ReachedNow,
    ReachedHorizon,
    NoWork,
    EventLimit,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutcome {
    pub end_time: Timestamp,
    pub events_processed: u64,
    pub stop_reason: StopReason,
}

#[derive(Debug)]
pub struct Colony {
    pub(crate) facilities: BTreeMap<PinId, Facility>,
    pub(crate) routes: RouteTable,
    pub current_time: Timestamp,
    /// Optional fixed horizon; events after it are never run.
    pub sim_end_time: Option<Timestamp>,
    pub max_events: u64,
    queue: EventQueue,
}

impl Colony {
    /// Builds a colony and wires each route onto both of its endpoints.
    pub fn new(facilities: Vec<Facility>, routes: Vec<Route>, current_time: Timestamp) -> Self {
        let mut facilities: BTreeMap<PinId, Facility> =
            facilities.into_iter().map(|f| (f.pin_id, f)).collect();

        for route in &routes {
            if let Some(source) = facilities.get_mut(&route.source_pin_id) {
                source.output_routes.push(*route);
            }
            if let Some(destination) = facilities.get_mut(&route.destination_pin_id) {
                destination.input_routes.push(*route);
            }
        }
        for facility in facilities.values_mut() {
            facility.status = facility.evaluate_status();
        }

        Self {
            facilities,
            routes: RouteTable::new(routes),
            current_time,
            sim_end_time: None,
            max_events: DEFAULT_MAX_EVENTS,
            queue: EventQueue::new(),
        }
    }

    #[cfg(test)]
    pub fn facility(&self, pin_id: PinId) -> Option<&Facility> {
        self.facilities.get(&pin_id)
    }

    pub fn facilities(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.values()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[cfg(test)]
    pub fn scheduled_time(&self, pin_id: PinId) -> Option<Timestamp> {
        self.queue.scheduled_time(pin_id)
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    pub fn has_working_facility(&self) -> bool {
        self.facilities.values().any(Facility::is_working)
    }

    /// Queues the pin's next run, keeping only the earliest pending time.
    pub fn schedule_facility(&mut self, pin_id: PinId) -> bool {
        let Some(next) = self.facilities.get(&pin_id).and_then(Facility::next_run_time) else {
            return false;
        };
        self.queue.schedule(pin_id, next)
    }

    pub fn initialize_simulation(&mut self) {
        let pin_ids: Vec<PinId> = self.facilities.keys().copied().collect();
        for pin_id in pin_ids {
            self.schedule_facility(pin_id);
        }
    }

    pub fn simulate(&mut self, until: EndCondition, clock: &dyn Clock) -> SimulationOutcome {
        if until == EndCondition::UntilWorkEnds && !self.has_working_facility() {
            return SimulationOutcome {
                end_time: self.current_time,
                events_processed: 0,
                stop_reason: StopReason::NoWork,
            };
        }

        self.initialize_simulation();
        tracing::debug!(pending = self.pending_events(), start = %self.current_time, "simulation started");

        let mut events_processed = 0;
        let stop_reason = loop {
            let Some((sim_time, pin_id)) = self.queue.peek() else {
                break StopReason::QueueExhausted;
            };

            // sampled per event so long runs track the moving wall clock
            let wall_now = match until {
                EndCondition::UntilNow => Some(clock.now()),
                EndCondition::UntilWorkEnds => None,
            };
            if wall_now.is_some_and(|now| sim_time > now) {
                break StopReason::ReachedNow;
            }
            if self.sim_end_time.is_some_and(|end| sim_time > end) {
                break StopReason::ReachedHorizon;
            }
            if events_processed >= self.max_events {
                tracing::warn!(
                    max_events = self.max_events,
                    at = %sim_time,
                    "event budget exhausted, stopping simulation"
                );
                break StopReason::EventLimit;
            }

            self.queue.pop();
            events_processed += 1;
            self.current_time = sim_time;

            let end_time = wall_now.or(self.sim_end_time);
            let runnable = self
                .facilities
                .get(&pin_id)
                .is_some_and(|facility| facility.can_run(end_time));
            if !runnable {
                tracing::debug!(pin_id, at = %sim_time, "skipping stale event");
                continue;
            }

            self.evaluate_pin(pin_id);
        };

        tracing::info!(
            events = events_processed,
            end = %self.current_time,
            reason = ?stop_reason,
            "simulation stopped"
        );

        SimulationOutcome {
            end_time: self.current_time,
            events_processed,
            stop_reason,
        }
    }

    /// Runs one cycle of a pin and moves the goods it touched.
    pub fn evaluate_pin(&mut self, pin_id: PinId) {
        let now = self.current_time;
        let Some(pin) = self.facilities.get_mut(&pin_id) else {
            return;
        };
        if !pin.is_working() {
            return;
        }

        let products = pin.run(now);
        let is_factory = pin.is_factory();

        if is_factory {
            self.route_commodity_input(pin_id);
        }

        if self.facilities.get(&pin_id).is_some_and(Facility::is_working) {
            self.schedule_facility(pin_id);
        }

        if !products.is_empty() {
            self.route_products(pin_id, &products);
        }

        if let Some(pin) = self.facilities.get_mut(&pin_id) {
            pin.status = pin.evaluate_status();
            tracing::debug!(
                pin_id,
                at = %now,
                status = pin.status.name(),
                produced = ?products,
                "evaluated pin"
            );
        }
    }

    /// Refreshes the status of every working pin and reports them.
    pub fn get_colony_status(&mut self, current_time: Timestamp) -> ColonyStatus {
        let mut pins = Vec::new();
        for facility in self.facilities.values_mut() {
            if facility.is_working() {
                facility.status = facility.evaluate_status();
                pins.push(PinSnapshot::of(facility));
            }
        }
        ColonyStatus {
            is_working: !pins.is_empty(),
            as_of: current_time,
            pins,
        }
    }

    /// Snapshot of every pin, working or not
    pub fn snapshot(&self) -> Vec<PinSnapshot> {
        self.facilities.values().map(PinSnapshot::of).collect()
    }

    pub fn total_contents(&self) -> Inventory {
        self.facilities
            .values()
            .flat_map(|f| f.contents.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::{DateTime, Duration};

    use super::*;
    use crate::clock::ManualClock;
    use crate::facility::{Extractor, FacilityKind, PinStatus};
    use crate::models::{Schematic, TypeId};

    const ORE: TypeId = 2268;
    const WATER: TypeId = 3645;
    const STORAGE: PinId = 1;
    const FACTORY: PinId = 2;
    const SINK: PinId = 3;

    fn at(secs: i64) -> Timestamp {
        DateTime::from_timestamp(1_737_000_000 + secs, 0).unwrap()
    }

    fn schematic() -> Schematic {
        Schematic {
            schematic_id: 131,
            cycle_time: 3600,
            input_type_id: ORE,
            input_quantity: 10,
            output_type_id: WATER,
            output_quantity: 5,
        }
    }

    fn storage(pin_id: PinId, capacity: f64, contents: &[(TypeId, u64)]) -> Facility {
        let volumes = Arc::new(HashMap::from([(ORE, 1.0), (WATER, 1.0)]));
        Facility::storage(pin_id, 2544, contents.iter().copied().collect(), capacity, volumes)
    }

    fn route(source: PinId, destination: PinId, type_id: TypeId, quantity: u64) -> Route {
        Route {
            source_pin_id: source,
            destination_pin_id: destination,
            content_type_id: type_id,
            quantity,
        }
    }

    /// Storage -> Factory -> Sink, with the factory about to start.
    fn production_line(stock: u64) -> Colony {
        let mut factory = Facility::factory(FACTORY, 2473, Inventory::default(), Some(schematic()));
        factory.last_run_time = Some(at(0));
        factory.accept(ORE, 10);

        Colony::new(
            vec![
                storage(STORAGE, 1000.0, &[(ORE, stock)]),
                factory,
                storage(SINK, 1000.0, &[]),
            ],
            vec![route(STORAGE, FACTORY, ORE, 10), route(FACTORY, SINK, WATER, 5)],
            at(0),
        )
    }

    fn water_at(colony: &Colony, pin: PinId) -> u64 {
        colony.facility(pin).unwrap().contents.get(WATER)
    }

    #[test]
    fn factory_emits_on_second_evaluation() {
        let mut colony = production_line(100);
        colony.sim_end_time = Some(at(2 * 3600));

        let outcome = colony.simulate(EndCondition::UntilWorkEnds, &ManualClock::new(at(0)));
        assert_eq!(outcome.events_processed, 2);
        assert_eq!(outcome.stop_reason, StopReason::ReachedHorizon);
        assert_eq!(outcome.end_time, at(2 * 3600));

        // cycle 1 consumed the seeded 10 and pulled 10 more; cycle 2 emitted 5
        assert_eq!(water_at(&colony, SINK), 5);
        let factory = colony.facility(FACTORY).unwrap();
        assert!(factory.is_active);
        assert_eq!(factory.status, PinStatus::Producing);
        assert_eq!(colony.facility(STORAGE).unwrap().contents.get(ORE), 80);
        assert_eq!(colony.scheduled_time(FACTORY), Some(at(3 * 3600)));
    }

    #[test]
    fn first_evaluation_produces_nothing() {
        let mut colony = production_line(100);
        colony.sim_end_time = Some(at(3600));
        colony.simulate(EndCondition::UntilWorkEnds, &ManualClock::new(at(0)));

        assert_eq!(water_at(&colony, SINK), 0);
        assert!(colony.facility(FACTORY).unwrap().is_active);
    }

    #[test]
    fn runs_until_stock_is_exhausted() {
        let mut colony = production_line(30);
        let outcome = colony.simulate(EndCondition::UntilWorkEnds, &ManualClock::new(at(0)));

        assert_eq!(outcome.stop_reason, StopReason::QueueExhausted);
        // seeded 10 plus 30 in stock make four batches
        assert_eq!(water_at(&colony, SINK), 20);
        assert!(colony.facility(STORAGE).unwrap().contents.is_empty());
        assert!(!colony.has_working_facility());

        let again = colony.simulate(EndCondition::UntilWorkEnds, &ManualClock::new(at(0)));
        assert_eq!(again.stop_reason, StopReason::NoWork);
        assert_eq!(again.events_processed, 0);
    }

    #[test]
    fn until_now_stops_at_wall_clock() {
        let mut colony = production_line(1000);
        let clock = ManualClock::new(at(3 * 3600 + 10));
        let outcome = colony.simulate(EndCondition::UntilNow, &clock);

        assert_eq!(outcome.stop_reason, StopReason::ReachedNow);
        assert_eq!(outcome.events_processed, 3);
        assert_eq!(colony.current_time, at(3 * 3600));
        // the next event stays queued for a later pass
        assert_eq!(colony.scheduled_time(FACTORY), Some(at(4 * 3600)));
        assert_eq!(water_at(&colony, SINK), 10);
    }

    #[test]
    fn until_now_resamples_the_clock() {
        // a clock that keeps pace with the hourly cycle never stops the run
        let mut colony = production_line(1000);
        let clock = ManualClock::with_step(at(3600), Duration::hours(1));
        let outcome = colony.simulate(EndCondition::UntilNow, &clock);
        assert_eq!(outcome.stop_reason, StopReason::QueueExhausted);
        // 101 batches consumed, then one final evaluation emits and stops
        assert_eq!(outcome.events_processed, 102);
        assert_eq!(water_at(&colony, SINK), 505);

        // one that falls behind stops at the second event
        let mut colony = production_line(1000);
        let clock = ManualClock::with_step(at(3600), Duration::minutes(30));
        let outcome = colony.simulate(EndCondition::UntilNow, &clock);
        assert_eq!(outcome.stop_reason, StopReason::ReachedNow);
        assert_eq!(outcome.events_processed, 1);
    }

    #[test]
    fn event_budget_bounds_the_loop() {
        let mut colony = production_line(1000);
        colony.max_events = 4;
        let outcome = colony.simulate(EndCondition::UntilWorkEnds, &ManualClock::new(at(0)));
        assert_eq!(outcome.stop_reason, StopReason::EventLimit);
        assert_eq!(outcome.events_processed, 4);
        assert_eq!(colony.current_time, at(4 * 3600));
    }

    #[test]
    fn scheduling_twice_keeps_one_entry() {
        let mut colony = production_line(100);
        assert!(colony.schedule_facility(FACTORY));
        assert!(!colony.schedule_facility(FACTORY));
        assert_eq!(colony.pending_events(), 1);
        assert_eq!(colony.scheduled_time(FACTORY), Some(at(3600)));
        // storages never run
        assert!(!colony.schedule_facility(STORAGE));
    }

    #[test]
    fn extractor_feeds_storage() {
        let mut extractor = Facility::new(
            9,
            2848,
            Inventory::default(),
            FacilityKind::Extractor(Extractor::new(Some(ORE), 500, 1800, at(0), at(4 * 1800))),
        );
        extractor.last_run_time = Some(at(0));
        extractor.is_active = true;

        let mut colony = Colony::new(
            vec![extractor, storage(STORAGE, 1_000_000.0, &[])],
            vec![route(9, STORAGE, ORE, 500)],
            at(0),
        );
        let outcome = colony.simulate(EndCondition::UntilWorkEnds, &ManualClock::new(at(0)));

        let curve = crate::extraction::ExtractorYield::new(500, 1800);
        assert_eq!(outcome.events_processed, 4);
        assert_eq!(
            colony.facility(STORAGE).unwrap().contents.get(ORE),
            curve.total_yield(4)
        );
        assert!(colony.facility(9).unwrap().contents.is_empty());
        assert_eq!(
            colony.facility(9).unwrap().status,
            PinStatus::ExtractorExpired
        );
    }

    #[test]
    fn unrouted_output_stays_with_the_producer() {
        let mut factory = Facility::factory(FACTORY, 2473, [(ORE, 20)].into_iter().collect(), Some(schematic()));
        factory.last_run_time = Some(at(0));
        let mut colony = Colony::new(vec![factory], vec![], at(0));

        colony.simulate(EndCondition::UntilWorkEnds, &ManualClock::new(at(0)));
        assert_eq!(water_at(&colony, FACTORY), 10);
        assert_eq!(
            colony.facility(FACTORY).unwrap().status,
            PinStatus::InputNotRouted
        );
    }

    #[test]
    fn colony_status_lists_working_pins() {
        let mut colony = production_line(100);
        let status = colony.get_colony_status(at(0));
        assert!(status.is_working);
        assert_eq!(status.pins.len(), 1);
        assert_eq!(status.pins[0].pin_id, FACTORY);
        assert_eq!(status.pins[0].status, PinStatus::Producing);
        assert_eq!(colony.snapshot().len(), 3);
    }
}
