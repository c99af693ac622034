use std::path::PathBuf;

use thiserror::Error;

use crate::models::PinId;

/// Reasons a scenario cannot be turned into a colony
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pin {pin_id}: bad timestamp {value:?} in {field} (expected YYYY-MM-DDTHH:MM:SSZ)")]
    Timestamp {
        pin_id: PinId,
        field: &'static str,
        value: String,
    },

    #[error("pin {pin_id}: no schematic found for id {schematic_id}")]
    MissingSchematic { pin_id: PinId, schematic_id: i64 },

    #[error("pin {pin_id}: cycle time must be positive, got {cycle_time}s")]
    NonPositiveCycleTime { pin_id: PinId, cycle_time: i64 },

    #[error("pin {pin_id}: extractor is missing {field}")]
    MissingExtractorBounds { pin_id: PinId, field: &'static str },

    #[error("duplicate pin id {0}")]
    DuplicatePin(PinId),

    #[error("route {source_pin_id} -> {destination_pin_id} references unknown pin {missing}")]
    UnknownRoutePin {
        source_pin_id: PinId,
        destination_pin_id: PinId,
        missing: PinId,
    },

    #[error("no extractors found in scenario")]
    NoExtractors,
}
