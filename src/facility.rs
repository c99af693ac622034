//! Colony facilities (pins) and their per-cycle behaviour
//!
//! Every pin shares the same bookkeeping (contents, last run, activity)
//! and differs only in how it decides to run and what a run produces.
//! That difference is captured by [`FacilityKind`].

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::catalog::VolumeTable;
use crate::extraction::ExtractorYield;
use crate::models::{PinId, Route, Schematic, TypeId};

pub type Timestamp = DateTime<Utc>;

/// Operational state reported for a pin. Derived from live fields, never
/// consulted when deciding whether a pin runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PinStatus {
    NotSetup,
    InputNotRouted,
    OutputNotRouted,
    FactoryIdle,
    Producing,
    Extracting,
    ExtractorExpired,
    ExtractorInactive,
    StorageFull,
    Static,
}

impl PinStatus {
    pub fn name(&self) -> &'static str {
        match self {
            PinStatus::NotSetup => "NOT_SETUP",
            PinStatus::InputNotRouted => "INPUT_NOT_ROUTED",
            PinStatus::OutputNotRouted => "OUTPUT_NOT_ROUTED",
            PinStatus::FactoryIdle => "FACTORY_IDLE",
            PinStatus::Producing => "PRODUCING",
            PinStatus::Extracting => "EXTRACTING",
            PinStatus::ExtractorExpired => "EXTRACTOR_EXPIRED",
            PinStatus::ExtractorInactive => "EXTRACTOR_INACTIVE",
            PinStatus::StorageFull => "STORAGE_FULL",
            PinStatus::Static => "STATIC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutedState {
    Unrouted,
    Routed,
    PartiallyRouted,
}

/// Commodity balances keyed by type. A zero balance is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<TypeId, u64>);

impl Inventory {
    pub fn get(&self, type_id: TypeId) -> u64 {
        self.0.get(&type_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.0.contains_key(&type_id)
    }

    pub fn add(&mut self, type_id: TypeId, quantity: u64) {
        if quantity > 0 {
            *self.0.entry(type_id).or_default() += quantity;
        }
    }

    /// Removes up to `quantity`, returning how much was actually taken.
    pub fn remove(&mut self, type_id: TypeId, quantity: u64) -> u64 {
        let Some(held) = self.0.get_mut(&type_id) else {
            return 0;
        };
        let removed = quantity.min(*held);
        *held -= removed;
        if *held == 0 {
            self.0.remove(&type_id);
        }
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, u64)> + '_ {
        self.0.iter().map(|(type_id, amount)| (*type_id, *amount))
    }

    pub fn type_ids(&self) -> Vec<TypeId> {
        self.0.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(TypeId, u64)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (TypeId, u64)>>(iter: I) -> Self {
        let mut inventory = Inventory::default();
        for (type_id, amount) in iter {
            inventory.add(type_id, amount);
        }
        inventory
    }
}

#[derive(Debug, Clone)]
pub struct Factory {
    pub schematic_id: Option<i64>,
    pub schematic: Option<Schematic>,
    pub last_cycle_start_time: Option<Timestamp>,
    pub has_received_inputs: bool,
    pub received_inputs_last_cycle: bool,
}

impl Factory {
    pub fn new(schematic_id: Option<i64>, schematic: Option<Schematic>) -> Self {
        Self {
            schematic_id,
            schematic,
            last_cycle_start_time: None,
            has_received_inputs: false,
            received_inputs_last_cycle: false,
        }
    }

    pub fn has_enough_inputs(&self, contents: &Inventory) -> bool {
        match &self.schematic {
            Some(schematic) => contents.get(schematic.input_type_id) >= u64::from(schematic.input_quantity),
            None => false,
        }
    }

    fn run(&mut self, contents: &mut Inventory, is_active: &mut bool, now: Timestamp) -> Inventory {
        let mut products = Inventory::default();

        match self.schematic {
            Some(schematic) => {
                // output always trails the inputs committed one cycle earlier
                if *is_active {
                    products.add(schematic.output_type_id, u64::from(schematic.output_quantity));
                }

                if self.has_enough_inputs(contents) {
                    contents.remove(schematic.input_type_id, u64::from(schematic.input_quantity));
                    *is_active = true;
                    self.last_cycle_start_time = Some(now);
                } else {
                    *is_active = false;
                }
            }
            None => *is_active = false,
        }

        self.received_inputs_last_cycle = self.has_received_inputs;
        self.has_received_inputs = false;
        products
    }
}

#[derive(Debug, Clone)]
pub struct Storage {
    pub capacity: f64,
    used_capacity: f64,
    volumes: VolumeTable,
}

impl Storage {
    pub fn new(capacity: f64, volumes: VolumeTable, contents: &Inventory) -> Self {
        let mut storage = Self {
            capacity,
            used_capacity: 0.0,
            volumes,
        };
        storage.update_capacity(contents);
        storage
    }

    fn volume(&self, type_id: TypeId) -> f64 {
        self.volumes.get(&type_id).copied().unwrap_or(0.0)
    }

    /// Recomputes used volume from scratch.
    pub fn update_capacity(&mut self, contents: &Inventory) {
        self.used_capacity = contents
            .iter()
            .map(|(type_id, amount)| amount as f64 * self.volume(type_id))
            .sum();
    }

    pub fn used_capacity(&self) -> f64 {
        self.used_capacity
    }

    pub fn capacity_remaining(&self) -> f64 {
        (self.capacity - self.used_capacity).max(0.0)
    }

    pub fn is_full(&self) -> bool {
        self.used_capacity >= self.capacity
    }

    /// How many units of `type_id` fit. `None` asks for as many as possible.
    pub fn can_accept(&self, type_id: TypeId, amount: Option<u64>) -> u64 {
        let volume = self.volume(type_id);
        let remaining = self.capacity_remaining();

        match amount {
            Some(amount) if volume * amount as f64 <= remaining => amount,
            _ if volume > 0.0 => (remaining / volume).floor() as u64,
            // weightless goods always fit
            _ => amount.unwrap_or(u64::MAX),
        }
    }

    pub fn add_commodity(&mut self, contents: &mut Inventory, type_id: TypeId, quantity: u64) -> u64 {
        let accepted = self.can_accept(type_id, Some(quantity));
        if accepted < 1 {
            return 0;
        }
        self.used_capacity += accepted as f64 * self.volume(type_id);
        contents.add(type_id, accepted);
        accepted
    }

    pub fn remove_commodity(&mut self, contents: &mut Inventory, type_id: TypeId, quantity: u64) -> u64 {
        let removed = contents.remove(type_id, quantity);
        self.used_capacity = (self.used_capacity - self.volume(type_id) * removed as f64).max(0.0);
        removed
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    pub product_type_id: Option<TypeId>,
    pub qty_per_cycle: u32,
    pub cycle_time: i64, // seconds
    pub install_time: Timestamp,
    pub expiry_time: Timestamp,
    curve: ExtractorYield,
}

impl Extractor {
    pub fn new(
        product_type_id: Option<TypeId>,
        qty_per_cycle: u32,
        cycle_time: i64,
        install_time: Timestamp,
        expiry_time: Timestamp,
    ) -> Self {
        Self {
            product_type_id,
            qty_per_cycle,
            cycle_time,
            install_time,
            expiry_time,
            curve: ExtractorYield::new(qty_per_cycle, cycle_time),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.product_type_id.is_some() && self.qty_per_cycle > 0 && self.cycle_time > 0
    }

    fn cycle_duration(&self) -> Duration {
        Duration::seconds(self.cycle_time)
    }

    /// Whether a cycle starting at `start` finishes before the head expires.
    pub fn cycle_fits(&self, start: Timestamp) -> bool {
        self.is_configured() && start + self.cycle_duration() <= self.expiry_time
    }

    /// Zero-based index of the cycle that ends at `now`.
    pub fn cycle_index(&self, now: Timestamp) -> u64 {
        if self.cycle_time <= 0 {
            return 0;
        }
        let elapsed = (now - self.install_time).num_seconds();
        (elapsed / self.cycle_time - 1).max(0) as u64
    }

    fn run(&mut self, is_active: &mut bool, now: Timestamp) -> Inventory {
        let mut products = Inventory::default();
        if *is_active {
            if let Some(product) = self.product_type_id {
                products.add(product, self.curve.yield_for_cycle(self.cycle_index(now)));
            }
        }
        *is_active = self.cycle_fits(now);
        products
    }
}

#[derive(Debug, Clone)]
pub enum FacilityKind {
    Factory(Factory),
    Storage(Storage),
    Extractor(Extractor),
}

#[derive(Debug, Clone)]
pub struct Facility {
    pub pin_id: PinId,
    pub type_id: TypeId,
    pub contents: Inventory,
    pub last_run_time: Option<Timestamp>,
    pub is_active: bool,
    pub status: PinStatus,
    pub input_routes: Vec<Route>,
    pub output_routes: Vec<Route>,
    pub kind: FacilityKind,
}

impl Facility {
    pub fn new(pin_id: PinId, type_id: TypeId, contents: Inventory, kind: FacilityKind) -> Self {
        Self {
            pin_id,
            type_id,
            contents,
            last_run_time: None,
            is_active: false,
            status: PinStatus::NotSetup,
            input_routes: Vec::new(),
            output_routes: Vec::new(),
            kind,
        }
    }

    pub fn storage(pin_id: PinId, type_id: TypeId, contents: Inventory, capacity: f64, volumes: VolumeTable) -> Self {
        let storage = Storage::new(capacity, volumes, &contents);
        Self::new(pin_id, type_id, contents, FacilityKind::Storage(storage))
    }

    #[cfg(test)]
    pub fn factory(pin_id: PinId, type_id: TypeId, contents: Inventory, schematic: Option<Schematic>) -> Self {
        let schematic_id = schematic.map(|s| s.schematic_id);
        Self::new(pin_id, type_id, contents, FacilityKind::Factory(Factory::new(schematic_id, schematic)))
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            FacilityKind::Factory(_) => "Factory",
            FacilityKind::Storage(_) => "Storage",
            FacilityKind::Extractor(_) => "Extractor",
        }
    }

    #[cfg(test)]
    pub fn as_factory(&self) -> Option<&Factory> {
        match &self.kind {
            FacilityKind::Factory(factory) => Some(factory),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_storage(&self) -> Option<&Storage> {
        match &self.kind {
            FacilityKind::Storage(storage) => Some(storage),
            _ => None,
        }
    }

    pub fn as_extractor(&self) -> Option<&Extractor> {
        match &self.kind {
            FacilityKind::Extractor(extractor) => Some(extractor),
            _ => None,
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self.kind, FacilityKind::Storage(_))
    }

    pub fn is_factory(&self) -> bool {
        matches!(self.kind, FacilityKind::Factory(_))
    }

    pub fn can_activate(&self) -> bool {
        match &self.kind {
            FacilityKind::Storage(_) => false,
            FacilityKind::Factory(factory) => {
                factory.schematic.is_some()
                    && (self.is_active
                        || factory.has_received_inputs
                        || factory.received_inputs_last_cycle
                        || factory.has_enough_inputs(&self.contents))
            }
            FacilityKind::Extractor(extractor) => {
                self.last_run_time.is_some_and(|last| extractor.cycle_fits(last))
            }
        }
    }

    /// Active now, or able to become active on its next evaluation.
    pub fn is_working(&self) -> bool {
        self.is_active || self.can_activate()
    }

    pub fn cycle_time(&self) -> Duration {
        match &self.kind {
            FacilityKind::Factory(Factory {
                schematic: Some(schematic),
                ..
            }) => Duration::seconds(schematic.cycle_time),
            FacilityKind::Extractor(extractor) => extractor.cycle_duration(),
            _ => Duration::zero(),
        }
    }

    pub fn next_run_time(&self) -> Option<Timestamp> {
        if !self.is_working() {
            return None;
        }
        self.last_run_time.map(|last| last + self.cycle_time())
    }

    pub fn can_run(&self, end_time: Option<Timestamp>) -> bool {
        if !self.is_working() {
            return false;
        }
        match (self.next_run_time(), end_time) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(next), Some(end)) => next <= end,
        }
    }

    /// Advances one cycle and returns what the cycle produced.
    pub fn run(&mut self, now: Timestamp) -> Inventory {
        let products = match &mut self.kind {
            FacilityKind::Factory(factory) => factory.run(&mut self.contents, &mut self.is_active, now),
            FacilityKind::Extractor(extractor) => extractor.run(&mut self.is_active, now),
            FacilityKind::Storage(_) => Inventory::default(),
        };
        self.last_run_time = Some(now);
        products
    }

    pub fn is_routed(&self) -> RoutedState {
        if self.input_routes.is_empty() && self.output_routes.is_empty() {
            return RoutedState::Unrouted;
        }
        let all_routed = self
            .input_routes
            .iter()
            .chain(&self.output_routes)
            .all(|route| route.quantity > 0);
        if all_routed {
            RoutedState::Routed
        } else {
            RoutedState::PartiallyRouted
        }
    }

    pub fn evaluate_status(&self) -> PinStatus {
        match &self.kind {
            FacilityKind::Factory(factory) => {
                if factory.schematic.is_none() {
                    PinStatus::NotSetup
                } else if !self.is_working() {
                    if self.is_routed() != RoutedState::Routed {
                        PinStatus::InputNotRouted
                    } else {
                        PinStatus::FactoryIdle
                    }
                } else {
                    PinStatus::Producing
                }
            }
            FacilityKind::Storage(storage) => {
                if storage.is_full() {
                    PinStatus::StorageFull
                } else {
                    PinStatus::Static
                }
            }
            FacilityKind::Extractor(extractor) => {
                if !extractor.is_configured() {
                    PinStatus::ExtractorInactive
                } else if !self.is_working() {
                    PinStatus::ExtractorExpired
                } else if self.output_routes.is_empty() {
                    PinStatus::OutputNotRouted
                } else {
                    PinStatus::Extracting
                }
            }
        }
    }

    /// Credits `quantity` of a commodity and returns how much was taken in.
    /// Storages are capacity bound; factories are uncapped input buffers.
    pub fn accept(&mut self, type_id: TypeId, quantity: u64) -> u64 {
        match &mut self.kind {
            FacilityKind::Storage(storage) => storage.add_commodity(&mut self.contents, type_id, quantity),
            FacilityKind::Factory(factory) => {
                self.contents.add(type_id, quantity);
                factory.has_received_inputs = true;
                quantity
            }
            FacilityKind::Extractor(_) => {
                self.contents.add(type_id, quantity);
                quantity
            }
        }
    }

    /// Debits up to `quantity` of a commodity and returns how much was removed.
    pub fn withdraw(&mut self, type_id: TypeId, quantity: u64) -> u64 {
        match &mut self.kind {
            FacilityKind::Storage(storage) => storage.remove_commodity(&mut self.contents, type_id, quantity),
            _ => self.contents.remove(type_id, quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;

    const ORE: TypeId = 2268;
    const WATER: TypeId = 3645;

    fn at(secs: i64) -> Timestamp {
        DateTime::from_timestamp(1_737_000_000 + secs, 0).unwrap()
    }

    fn volumes() -> VolumeTable {
        Arc::new(HashMap::from([(ORE, 1.0), (WATER, 0.38)]))
    }

    fn storage(capacity: f64, contents: &[(TypeId, u64)]) -> Facility {
        Facility::storage(1, 2544, contents.iter().copied().collect(), capacity, volumes())
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

    fn used(facility: &Facility) -> f64 {
        facility.as_storage().unwrap().used_capacity()
    }

    #[test]
    fn inventory_drops_zero_balances() {
        let mut inv: Inventory = [(ORE, 3), (WATER, 0)].into_iter().collect();
        assert!(!inv.contains(WATER));
        assert_eq!(inv.remove(ORE, 5), 3);
        assert!(inv.is_empty());
        assert_eq!(inv.remove(ORE, 1), 0);
    }

    #[test]
    fn storage_is_a_static_pin() {
        let mut pin = storage(1000.0, &[(ORE, 5)]);
        assert_eq!(pin.withdraw(ORE, 10), 5);
        assert_eq!(pin.cycle_time(), Duration::zero());
        assert!(!pin.is_working());
        assert_eq!(pin.next_run_time(), None);
        assert_eq!(pin.evaluate_status(), PinStatus::Static);
        assert!(pin.run(at(0)).is_empty());
    }

    #[test]
    fn storage_truncates_to_what_fits() {
        let mut s = storage(100.0, &[(ORE, 95)]);
        assert_eq!(s.accept(ORE, 10), 5);
        assert_eq!(s.contents.get(ORE), 100);
        assert_eq!(used(&s), 100.0);
        assert_eq!(s.evaluate_status(), PinStatus::StorageFull);
        assert_eq!(s.accept(ORE, 1), 0);
        assert_eq!(s.contents.get(ORE), 100);
    }

    #[test]
    fn storage_rejects_below_one_unit() {
        let mut s = storage(0.5, &[]);
        assert_eq!(s.accept(ORE, 3), 0);
        assert!(s.contents.is_empty());
        assert_eq!(used(&s), 0.0);
    }

    #[test]
    fn can_accept_as_much_as_possible() {
        let s = storage(10.0, &[]);
        let inner = s.as_storage().unwrap();
        assert_eq!(inner.can_accept(WATER, None), 26);
        assert_eq!(inner.can_accept(WATER, Some(3)), 3);
        // unknown volume takes no space
        assert_eq!(inner.can_accept(42, Some(1_000_000)), 1_000_000);
        assert_eq!(inner.can_accept(42, None), u64::MAX);
    }

    #[test]
    fn storage_removal_clamps_drift_at_zero() {
        let mut s = storage(1000.0, &[(WATER, 3)]);
        assert_eq!(s.withdraw(WATER, 10), 3);
        assert!(!s.contents.contains(WATER));
        assert!(used(&s) >= 0.0);
        assert!(used(&s) < 1e-9);
    }

    #[test]
    fn storage_never_exceeds_capacity() {
        let mut s = storage(50.0, &[]);
        for _ in 0..20 {
            s.accept(WATER, 17);
            s.accept(ORE, 3);
            assert!(used(&s) <= 50.0);
        }
    }

    #[test]
    fn storage_is_passive() {
        let mut s = storage(1000.0, &[(ORE, 500)]);
        s.last_run_time = Some(at(0));
        assert!(!s.can_activate());
        assert_eq!(s.next_run_time(), None);
        assert!(s.run(at(10)).is_empty());
        assert_eq!(s.evaluate_status(), PinStatus::Static);
    }

    #[test]
    fn factory_output_trails_input_by_one_cycle() {
        let mut f = Facility::factory(2, 2473, [(ORE, 1000)].into_iter().collect(), Some(schematic()));
        f.last_run_time = Some(at(0));

        let mut total = 0;
        let cycles = 6;
        for n in 0..=cycles {
            let next = f.next_run_time().unwrap();
            assert_eq!(next, at(3600 * (n + 1)));
            total += f.run(next).get(WATER);
            if n == 0 {
                assert_eq!(total, 0);
            }
            assert!(f.is_active);
        }
        assert_eq!(total, cycles as u64 * 5);
        assert_eq!(f.contents.get(ORE), 1000 - 10 * (cycles as u64 + 1));
    }

    #[test]
    fn underfed_factory_stops_without_partial_consumption() {
        let mut f = Facility::factory(2, 2473, [(ORE, 7)].into_iter().collect(), Some(schematic()));
        f.is_active = true;
        let products = f.run(at(0));
        assert_eq!(products.get(WATER), 5);
        assert!(!f.is_active);
        assert_eq!(f.contents.get(ORE), 7);
        assert!(!f.can_activate());
    }

    #[test]
    fn received_inputs_keep_factory_activatable_for_two_cycles() {
        let mut f = Facility::factory(2, 2473, Inventory::default(), Some(schematic()));
        f.last_run_time = Some(at(0));
        assert!(!f.can_activate());

        f.accept(ORE, 3);
        assert!(f.can_activate());

        f.run(at(3600));
        assert!(!f.is_active);
        assert!(f.can_activate(), "grace window spans the following cycle");

        f.run(at(7200));
        assert!(!f.can_activate());
        assert_eq!(f.next_run_time(), None);
    }

    #[test]
    fn factory_without_schematic_is_not_setup() {
        let mut f = Facility::factory(2, 2473, [(ORE, 100)].into_iter().collect(), None);
        f.is_active = true;
        f.output_routes.push(Route {
            source_pin_id: 2,
            destination_pin_id: 3,
            content_type_id: WATER,
            quantity: 5,
        });
        assert!(!f.can_activate());
        assert_eq!(f.evaluate_status(), PinStatus::NotSetup);
    }

    #[test]
    fn idle_factory_status_depends_on_routing() {
        let mut f = Facility::factory(2, 2473, Inventory::default(), Some(schematic()));
        assert_eq!(f.evaluate_status(), PinStatus::InputNotRouted);

        f.input_routes.push(Route {
            source_pin_id: 1,
            destination_pin_id: 2,
            content_type_id: ORE,
            quantity: 10,
        });
        assert_eq!(f.is_routed(), RoutedState::Routed);
        assert_eq!(f.evaluate_status(), PinStatus::FactoryIdle);

        f.output_routes.push(Route {
            source_pin_id: 2,
            destination_pin_id: 3,
            content_type_id: WATER,
            quantity: 0,
        });
        assert_eq!(f.is_routed(), RoutedState::PartiallyRouted);
        assert_eq!(f.evaluate_status(), PinStatus::InputNotRouted);
    }

    #[test]
    fn can_run_respects_end_time() {
        let mut f = Facility::factory(2, 2473, [(ORE, 10)].into_iter().collect(), Some(schematic()));
        assert!(!f.can_run(None), "no prior run means no next run");

        f.last_run_time = Some(at(0));
        assert!(f.can_run(None));
        assert!(f.can_run(Some(at(3600))));
        assert!(!f.can_run(Some(at(3599))));
    }

    fn extractor(install: i64, expiry: i64) -> Facility {
        let mut f = Facility::new(
            9,
            2848,
            Inventory::default(),
            FacilityKind::Extractor(Extractor::new(Some(ORE), 1000, 3600, at(install), at(expiry))),
        );
        f.last_run_time = Some(at(install));
        f.is_active = true;
        f
    }

    #[test]
    fn extractor_follows_yield_curve_until_expiry() {
        let mut f = extractor(0, 3 * 3600);
        let curve = ExtractorYield::new(1000, 3600);

        let mut produced = Vec::new();
        while let Some(next) = f.next_run_time() {
            produced.push(f.run(next).get(ORE));
        }
        assert_eq!(
            produced,
            vec![curve.yield_for_cycle(0), curve.yield_for_cycle(1), curve.yield_for_cycle(2)]
        );
        assert!(!f.is_active);
        assert_eq!(f.evaluate_status(), PinStatus::ExtractorExpired);
    }

    #[test]
    fn extractor_status_reports_routing_and_setup() {
        let f = extractor(0, 10 * 3600);
        assert_eq!(f.evaluate_status(), PinStatus::OutputNotRouted);

        let mut routed = extractor(0, 10 * 3600);
        routed.output_routes.push(Route {
            source_pin_id: 9,
            destination_pin_id: 1,
            content_type_id: ORE,
            quantity: 1000,
        });
        assert_eq!(routed.evaluate_status(), PinStatus::Extracting);

        let idle = Facility::new(
            9,
            2848,
            Inventory::default(),
            FacilityKind::Extractor(Extractor::new(None, 0, 3600, at(0), at(3600))),
        );
        assert_eq!(idle.evaluate_status(), PinStatus::ExtractorInactive);
    }

    #[test]
    fn status_names_match_report_format() {
        assert_eq!(PinStatus::StorageFull.name(), "STORAGE_FULL");
        assert_eq!(
            serde_json::to_string(&PinStatus::InputNotRouted).unwrap(),
            "\"INPUT_NOT_ROUTED\""
        );
    }
}
