//! Colony status snapshots and the text report

use std::fmt;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::colony::{Colony, SimulationOutcome};
use crate::facility::{Facility, FacilityKind, Inventory, PinStatus, Timestamp};
use crate::models::{PinId, Schematic, TypeId};

#[derive(Debug, Clone, Serialize)]
pub struct ColonyStatus {
    pub is_working: bool,
    pub as_of: Timestamp,
    pub pins: Vec<PinSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactoryDetail {
    pub schematic_id: Option<i64>,
    pub schematic: Option<Schematic>,
    pub last_cycle_start_time: Option<Timestamp>,
    pub has_received_inputs: bool,
    pub received_inputs_last_cycle: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageDetail {
    pub capacity: f64,
    pub used_capacity: f64,
    pub remaining_capacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractorDetail {
    pub product_type_id: Option<TypeId>,
    pub qty_per_cycle: u32,
    pub cycle_time: i64,
    pub install_time: Timestamp,
    pub expiry_time: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinSnapshot {
    pub pin_id: PinId,
    pub type_id: TypeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub kind: &'static str,
    pub status: PinStatus,
    pub is_active: bool,
    pub last_run_time: Option<Timestamp>,
    pub contents: Inventory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory: Option<FactoryDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractor: Option<ExtractorDetail>,
}

impl PinSnapshot {
    pub fn of(facility: &Facility) -> Self {
        let mut snapshot = Self {
            pin_id: facility.pin_id,
            type_id: facility.type_id,
            type_name: None,
            kind: facility.kind_name(),
            status: facility.status,
            is_active: facility.is_active,
            last_run_time: facility.last_run_time,
            contents: facility.contents.clone(),
            factory: None,
            storage: None,
            extractor: None,
        };

        match &facility.kind {
            FacilityKind::Factory(factory) => {
                snapshot.factory = Some(FactoryDetail {
                    schematic_id: factory.schematic_id,
                    schematic: factory.schematic,
                    last_cycle_start_time: factory.last_cycle_start_time,
                    has_received_inputs: factory.has_received_inputs,
                    received_inputs_last_cycle: factory.received_inputs_last_cycle,
                })
            }
            FacilityKind::Storage(storage) => {
                snapshot.storage = Some(StorageDetail {
                    capacity: storage.capacity,
                    used_capacity: storage.used_capacity(),
                    remaining_capacity: storage.capacity_remaining(),
                })
            }
            FacilityKind::Extractor(extractor) => {
                snapshot.extractor = Some(ExtractorDetail {
                    product_type_id: extractor.product_type_id,
                    qty_per_cycle: extractor.qty_per_cycle,
                    cycle_time: extractor.cycle_time,
                    install_time: extractor.install_time,
                    expiry_time: extractor.expiry_time,
                })
            }
        }
        snapshot
    }

    pub fn named(mut self, catalog: &Catalog) -> Self {
        self.type_name = Some(catalog.type_name(self.type_id));
        self
    }
}

/// Machine-readable result of a `simulate` run
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub outcome: SimulationOutcome,
    pub is_working: bool,
    pub pins: Vec<PinSnapshot>,
}

impl SimulationReport {
    pub fn new(colony: &Colony, catalog: &Catalog, outcome: SimulationOutcome) -> Self {
        Self {
            outcome,
            is_working: colony.has_working_facility(),
            pins: colony
                .snapshot()
                .into_iter()
                .map(|pin| pin.named(catalog))
                .collect(),
        }
    }
}

/// Human-readable report of every pin in a colony
pub struct ColonyReport<'a> {
    colony: &'a Colony,
    catalog: &'a Catalog,
    now: Timestamp,
}

pub fn colony_report<'a>(colony: &'a Colony, catalog: &'a Catalog, now: Timestamp) -> ColonyReport<'a> {
    ColonyReport { colony, catalog, now }
}

impl fmt::Display for ColonyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.catalog;

        writeln!(f, "=== Colony at {} ===", self.now.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "Simulated up to: {}", self.colony.current_time.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "Working: {}", self.colony.has_working_facility())?;
        let routes = self.colony.routes();
        if routes.is_empty() {
            writeln!(f, "Routes: none")?;
        } else {
            writeln!(f, "Routes: {}", routes.len())?;
        }

        for pin in self.colony.facilities() {
            writeln!(f)?;
            writeln!(f, "Pin {} [{}]", pin.pin_id, pin.kind_name())?;
            writeln!(f, "  Type:   {} ({})", pin.type_id, catalog.type_name(pin.type_id))?;
            writeln!(f, "  Status: {}", pin.status.name())?;

            if pin.contents.is_empty() {
                writeln!(f, "  Contents: empty")?;
            } else {
                writeln!(f, "  Contents:")?;
                for (type_id, amount) in pin.contents.iter() {
                    writeln!(
                        f,
                        "    - {}: {} ({:.2} m3)",
                        catalog.type_name(type_id),
                        amount,
                        amount as f64 * catalog.volume(type_id)
                    )?;
                }
            }

            match &pin.kind {
                FacilityKind::Factory(factory) => {
                    match factory.schematic_id {
                        Some(id) => writeln!(f, "  Schematic: {}", id)?,
                        None => writeln!(f, "  Schematic: none")?,
                    }
                    match factory.last_cycle_start_time {
                        Some(start) => writeln!(f, "  Last cycle start: {}", start)?,
                        None => writeln!(f, "  Last cycle start: never")?,
                    }
                    writeln!(f, "  Active: {}", pin.is_active)?;
                    if let Some(schematic) = &factory.schematic {
                        writeln!(f, "  Cycle time: {}s", schematic.cycle_time)?;
                        writeln!(
                            f,
                            "  Input:  {} x {}",
                            schematic.input_quantity,
                            catalog.type_name(schematic.input_type_id)
                        )?;
                        writeln!(
                            f,
                            "  Output: {} x {}",
                            schematic.output_quantity,
                            catalog.type_name(schematic.output_type_id)
                        )?;
                    }
                }
                FacilityKind::Storage(storage) => {
                    writeln!(f, "  Capacity:  {:.2} m3", storage.capacity)?;
                    writeln!(f, "  Used:      {:.2} m3", storage.used_capacity())?;
                    writeln!(f, "  Remaining: {:.2} m3", storage.capacity_remaining())?;
                }
                FacilityKind::Extractor(extractor) => {
                    match extractor.product_type_id {
                        Some(product) => writeln!(f, "  Product: {}", catalog.type_name(product))?,
                        None => writeln!(f, "  Product: none")?,
                    }
                    writeln!(f, "  Base quantity: {}/cycle", extractor.qty_per_cycle)?;
                    writeln!(f, "  Cycle time: {}s", extractor.cycle_time)?;
                    writeln!(f, "  Installed: {}", extractor.install_time)?;
                    writeln!(f, "  Expires:   {}", extractor.expiry_time)?;
                }
            }
        }

        let totals = self.colony.total_contents();
        if !totals.is_empty() {
            writeln!(f)?;
            writeln!(f, "Colony totals:")?;
            for (type_id, amount) in totals.iter() {
                writeln!(f, "  {:<30} {:>12}", catalog.type_name(type_id), amount)?;
            }
        }

        Ok(())
    }
}
