//! Static route table and proportional splitting

use crate::models::{PinId, Route, TypeId};

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes carrying `type_id` out of `source`
    pub fn from_source(&self, source: PinId, type_id: TypeId) -> Vec<Route> {
        self.routes
            .iter()
            .filter(|r| r.source_pin_id == source && r.content_type_id == type_id)
            .copied()
            .collect()
    }

    /// Routes ending at `destination`, any commodity
    pub fn into_destination(&self, destination: PinId) -> Vec<Route> {
        self.routes
            .iter()
            .filter(|r| r.destination_pin_id == destination)
            .copied()
            .collect()
    }
}

/// Splits `total` across routes by their quantity weight.
///
/// Each share is `floor(total * weight / sum_of_weights)`; remainders are
/// dropped, not redistributed. Returns nothing when the weights sum to zero.
pub fn proportional_shares(total: u64, routes: &[Route]) -> Vec<(Route, u64)> {
    let weight_sum: u64 = routes.iter().map(|r| r.quantity).sum();
    if weight_sum == 0 {
        return Vec::new();
    }
    routes
        .iter()
        .map(|route| {
            let share = route.quantity as f64 / weight_sum as f64;
            (*route, (total as f64 * share).floor() as u64)
        })
        .collect()
}
