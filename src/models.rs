//! Data models for PI types, schematics, routes and scenario files

use serde::{Deserialize, Deserializer, Serialize};

pub type PinId = i64;
pub type TypeId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeInfo {
    pub type_id: TypeId,
    pub name: String,
    pub volume: f64, // m3 per unit
}

/// A production recipe: one input commodity, one output commodity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Schematic {
    pub schematic_id: i64,
    pub cycle_time: i64, // seconds
    pub input_type_id: TypeId,
    pub input_quantity: u32,
    pub output_type_id: TypeId,
    pub output_quantity: u32,
}

/// A directed, weighted link moving one commodity between two pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub source_pin_id: PinId,
    pub destination_pin_id: PinId,
    pub content_type_id: TypeId,
    #[serde(deserialize_with = "whole_quantity")]
    pub quantity: u64,
}

/// Accepts `3000` as well as `3000.0`; fractions are truncated.
fn whole_quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Whole(u64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Whole(n) => Ok(n),
        Number::Float(f) if f.is_finite() && f >= 0.0 => Ok(f.trunc() as u64),
        Number::Float(f) => Err(serde::de::Error::custom(format!("invalid route quantity {}", f))),
    }
}

/// Distinguishes a present-but-null key from a missing one.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// Scenario file layout, as exported by the colony API

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub pins: Vec<PinData>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinData {
    pub pin_id: PinId,
    pub type_id: TypeId,
    #[serde(default)]
    pub contents: Vec<ContentEntry>,
    /// Any `schematic_id` key marks a factory, even a null one.
    #[serde(default, deserialize_with = "present")]
    pub schematic_id: Option<Option<i64>>,
    pub last_cycle_start: Option<String>,
    pub extractor_details: Option<ExtractorDetails>,
    pub install_time: Option<String>,
    pub expiry_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    pub type_id: TypeId,
    pub amount: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorDetails {
    pub qty_per_cycle: u32,
    pub cycle_time: i64,
    pub product_type_id: Option<TypeId>,
}
