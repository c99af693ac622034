//! Commodity movement between pins
//!
//! Transfers always take the live balance of the source as the upper bound
//! and credit the destination first, so a storage that is short on space
//! only gives up what the destination actually took.

use crate::colony::Colony;
use crate::facility::Inventory;
use crate::models::{PinId, TypeId};
use crate::route::proportional_shares;

/// What a single transfer actually moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub type_id: TypeId,
    pub amount: u64,
}

impl Colony {
    /// Moves up to `quantity` of `type_id` from `source_id` to `dest_id`.
    ///
    /// Returns `None` when the source holds none of the commodity (or either
    /// pin is unknown). Otherwise the returned amount is what the destination
    /// accepted and the source was debited by, which may be zero.
    pub fn transfer_commodities(
        &mut self,
        source_id: PinId,
        dest_id: PinId,
        type_id: TypeId,
        quantity: u64,
        max_amount: Option<u64>,
    ) -> Option<Transfer> {
        let source = self.facilities.get(&source_id)?;
        if !source.contents.contains(type_id) {
            return None;
        }

        let mut amount = source.contents.get(type_id).min(quantity);
        if let Some(max_amount) = max_amount {
            amount = amount.min(max_amount);
        }
        if amount == 0 {
            return None;
        }

        let Some(destination) = self.facilities.get_mut(&dest_id) else {
            tracing::warn!(source_id, dest_id, "transfer to unknown pin ignored");
            return None;
        };
        let moved = destination.accept(type_id, amount);

        if let Some(source) = self.facilities.get_mut(&source_id) {
            source.withdraw(type_id, moved);
        }

        Some(Transfer { type_id, amount: moved })
    }

    /// Credits freshly produced goods to the source, then pushes everything
    /// it holds along its output routes.
    pub fn route_products(&mut self, source_id: PinId, products: &Inventory) {
        let Some(source) = self.facilities.get_mut(&source_id) else {
            return;
        };
        for (type_id, amount) in products.iter() {
            source.contents.add(type_id, amount);
        }

        for type_id in source.contents.type_ids() {
            let routes = self.routes.from_source(source_id, type_id);
            if routes.is_empty() {
                if products.contains(type_id) {
                    tracing::warn!(source_id, type_id, "no route for product, kept at source");
                }
                continue;
            }

            let available = self
                .facilities
                .get(&source_id)
                .map_or(0, |source| source.contents.get(type_id));

            for (route, share) in proportional_shares(available, &routes) {
                if share == 0 {
                    continue;
                }
                self.transfer_commodities(source_id, route.destination_pin_id, type_id, share, None);
            }
        }
    }

    /// Pulls a factory's routed inputs from upstream storages. Each route
    /// asks for its own quantity, bounded by what its source holds.
    pub fn route_commodity_input(&mut self, dest_id: PinId) {
        for route in self.routes.into_destination(dest_id) {
            // factories only draw from storages
            let from_storage = self
                .facilities
                .get(&route.source_pin_id)
                .is_some_and(|source| source.is_storage());
            if !from_storage || route.quantity == 0 {
                continue;
            }
            self.transfer_commodities(
                route.source_pin_id,
                dest_id,
                route.content_type_id,
                route.quantity,
                None,
            );
        }
    }
}
