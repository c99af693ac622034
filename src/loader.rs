//! Scenario loading: JSON colony export + static data -> validated `Colony`

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::catalog::Catalog;
use crate::colony::Colony;
use crate::error::LoadError;
use crate::facility::{Extractor, Facility, FacilityKind, Factory, Inventory, Timestamp};
use crate::models::{PinData, PinId, ScenarioFile};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Reject scenarios without a single extractor
    pub require_extractors: bool,
}

pub fn load_scenario(
    path: &Path,
    catalog: &Catalog,
    options: LoadOptions,
    now: Timestamp,
) -> Result<Colony, LoadError> {
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scenario(&json, catalog, options, now)
}

pub fn parse_scenario(
    json: &str,
    catalog: &Catalog,
    options: LoadOptions,
    now: Timestamp,
) -> Result<Colony, LoadError> {
    let scenario: ScenarioFile = serde_json::from_str(json)?;
    build_colony(scenario, catalog, options, now)
}

/// Parses the `YYYY-MM-DDTHH:MM:SSZ` form used throughout colony exports
pub fn parse_utc(value: &str) -> Result<Timestamp, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

pub fn parse_timestamp(pin_id: PinId, field: &'static str, value: &str) -> Result<Timestamp, LoadError> {
    parse_utc(value).map_err(|_| LoadError::Timestamp {
        pin_id,
        field,
        value: value.to_string(),
    })
}

fn optional_timestamp(
    pin_id: PinId,
    field: &'static str,
    value: Option<&String>,
) -> Result<Option<Timestamp>, LoadError> {
    value.map(|v| parse_timestamp(pin_id, field, v)).transpose()
}

fn build_pin(data: &PinData, catalog: &Catalog) -> Result<Facility, LoadError> {
    let pin_id = data.pin_id;
    // a repeated type id replaces the earlier entry
    let contents: Inventory = data
        .contents
        .iter()
        .map(|c| (c.type_id, c.amount))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect();
    let last_cycle_start = optional_timestamp(pin_id, "last_cycle_start", data.last_cycle_start.as_ref())?;

    if let Some(details) = &data.extractor_details {
        if details.cycle_time <= 0 {
            return Err(LoadError::NonPositiveCycleTime {
                pin_id,
                cycle_time: details.cycle_time,
            });
        }
        let install_time = optional_timestamp(pin_id, "install_time", data.install_time.as_ref())?
            .ok_or(LoadError::MissingExtractorBounds {
                pin_id,
                field: "install_time",
            })?;
        let expiry_time = optional_timestamp(pin_id, "expiry_time", data.expiry_time.as_ref())?
            .ok_or(LoadError::MissingExtractorBounds {
                pin_id,
                field: "expiry_time",
            })?;

        let extractor = Extractor::new(
            details.product_type_id,
            details.qty_per_cycle,
            details.cycle_time,
            install_time,
            expiry_time,
        );
        let last_run = last_cycle_start.unwrap_or(install_time);
        let is_active = extractor.cycle_fits(last_run);

        let mut facility = Facility::new(pin_id, data.type_id, contents, FacilityKind::Extractor(extractor));
        facility.last_run_time = Some(last_run);
        facility.is_active = is_active;
        return Ok(facility);
    }

    if let Some(schematic_id) = data.schematic_id {
        // null or 0 is an unconfigured factory
        let schematic = if let Some(schematic_id) = schematic_id.filter(|id| *id > 0) {
            let schematic = catalog
                .schematic(schematic_id)
                .copied()
                .ok_or(LoadError::MissingSchematic { pin_id, schematic_id })?;
            if schematic.cycle_time <= 0 {
                return Err(LoadError::NonPositiveCycleTime {
                    pin_id,
                    cycle_time: schematic.cycle_time,
                });
            }
            Some(schematic)
        } else {
            None
        };

        let mut factory = Factory::new(schematic_id, schematic);
        factory.last_cycle_start_time = last_cycle_start;

        let mut facility = Facility::new(pin_id, data.type_id, contents, FacilityKind::Factory(factory));
        if let Some(start) = last_cycle_start {
            facility.last_run_time = Some(start);
            facility.is_active = true;
        }
        return Ok(facility);
    }

    let capacity = catalog.storage_capacity(data.type_id);
    Ok(Facility::storage(pin_id, data.type_id, contents, capacity, catalog.volumes()))
}

pub fn build_colony(
    scenario: ScenarioFile,
    catalog: &Catalog,
    options: LoadOptions,
    now: Timestamp,
) -> Result<Colony, LoadError> {
    let mut seen = HashSet::new();
    let mut facilities = Vec::with_capacity(scenario.pins.len());
    for data in &scenario.pins {
        if !seen.insert(data.pin_id) {
            return Err(LoadError::DuplicatePin(data.pin_id));
        }
        facilities.push(build_pin(data, catalog)?);
    }

    for route in &scenario.routes {
        for endpoint in [route.source_pin_id, route.destination_pin_id] {
            if !seen.contains(&endpoint) {
                return Err(LoadError::UnknownRoutePin {
                    source_pin_id: route.source_pin_id,
                    destination_pin_id: route.destination_pin_id,
                    missing: endpoint,
                });
            }
        }
    }

    let extractor_count = facilities.iter().filter(|f| f.as_extractor().is_some()).count();
    if options.require_extractors && extractor_count == 0 {
        return Err(LoadError::NoExtractors);
    }

    let earliest_cycle_start = scenario
        .pins
        .iter()
        .filter_map(|p| p.last_cycle_start.as_ref().map(|v| parse_timestamp(p.pin_id, "last_cycle_start", v)))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .min();
    let earliest_install = facilities
        .iter()
        .filter_map(|f| f.as_extractor().map(|e| e.install_time))
        .min();
    let start = earliest_cycle_start.or(earliest_install).unwrap_or(now);

    tracing::info!(
        pins = facilities.len(),
        routes = scenario.routes.len(),
        extractors = extractor_count,
        start = %start,
        "loaded colony"
    );

    Ok(Colony::new(facilities, scenario.routes, start))
}
