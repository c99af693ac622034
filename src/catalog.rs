//! In-memory view of the static side data the simulator consults

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Schematic, TypeId, TypeInfo};

/// Unit volume per commodity type, shared by every storage of a colony.
pub type VolumeTable = Arc<HashMap<TypeId, f64>>;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: HashMap<TypeId, TypeInfo>,
    volumes: VolumeTable,
    schematics: HashMap<i64, Schematic>,
    capacities: HashMap<TypeId, f64>,
}

impl Catalog {
    pub fn new(
        types: Vec<TypeInfo>,
        schematics: Vec<Schematic>,
        capacities: Vec<(TypeId, f64)>,
    ) -> Self {
        let volumes = types.iter().map(|t| (t.type_id, t.volume)).collect();
        Self {
            types: types.into_iter().map(|t| (t.type_id, t)).collect(),
            volumes: Arc::new(volumes),
            schematics: schematics.into_iter().map(|s| (s.schematic_id, s)).collect(),
            capacities: capacities.into_iter().collect(),
        }
    }

    pub fn volumes(&self) -> VolumeTable {
        Arc::clone(&self.volumes)
    }

    /// Unit volume of a type. Unknown types take no space.
    pub fn volume(&self, type_id: TypeId) -> f64 {
        self.volumes.get(&type_id).copied().unwrap_or(0.0)
    }

    pub fn type_name(&self, type_id: TypeId) -> String {
        match self.types.get(&type_id) {
            Some(info) => info.name.clone(),
            None => format!("Unknown Type ({})", type_id),
        }
    }

    pub fn schematic(&self, schematic_id: i64) -> Option<&Schematic> {
        self.schematics.get(&schematic_id)
    }

    /// Storage capacity for a pin type; types missing from the table hold nothing.
    pub fn storage_capacity(&self, pin_type_id: TypeId) -> f64 {
        self.capacities.get(&pin_type_id).copied().unwrap_or(0.0)
    }

    pub fn schematic_count(&self) -> usize {
        self.schematics.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}
