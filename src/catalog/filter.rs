//! Filter state and predicate evaluation.
//!
//! A ship passes when every active category passes (AND); multi-select
//! categories pass when the ship matches any selected value (OR). Empty
//! selections are inactive.

use std::borrow::Borrow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::types::{NormalizedShip, ShipType};

/// Active filter selections.
///
/// `premium_only` and `special_only` are never both set when mutated
/// through the setters; evaluation itself treats them independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_text: String,
    pub nations: BTreeSet<String>,
    pub types: BTreeSet<ShipType>,
    pub tiers: BTreeSet<u32>,
    pub premium_only: bool,
    pub special_only: bool,
}

impl FilterState {
    /// Whether no filter is active. Whitespace-only search text is inactive.
    pub fn is_empty(&self) -> bool {
        self.search_text.trim().is_empty()
            && self.nations.is_empty()
            && self.types.is_empty()
            && self.tiers.is_empty()
            && !self.premium_only
            && !self.special_only
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn toggle_nation(&mut self, nation: &str) {
        if !self.nations.remove(nation) {
            self.nations.insert(nation.to_string());
        }
    }

    pub fn toggle_type(&mut self, ship_type: ShipType) {
        if !self.types.remove(&ship_type) {
            self.types.insert(ship_type);
        }
    }

    pub fn toggle_tier(&mut self, tier: u32) {
        if !self.tiers.remove(&tier) {
            self.tiers.insert(tier);
        }
    }

    /// Set premium-only; enabling it clears special-only.
    pub fn set_premium_only(&mut self, on: bool) {
        self.premium_only = on;
        if on {
            self.special_only = false;
        }
    }

    /// Set special-only; enabling it clears premium-only.
    pub fn set_special_only(&mut self, on: bool) {
        self.special_only = on;
        if on {
            self.premium_only = false;
        }
    }

    pub fn toggle_premium_only(&mut self) {
        self.set_premium_only(!self.premium_only);
    }

    pub fn toggle_special_only(&mut self) {
        self.set_special_only(!self.special_only);
    }

    /// Restore premium/special exclusivity on a state built by hand.
    /// Premium wins when both are set.
    pub fn normalized(mut self) -> Self {
        if self.premium_only && self.special_only {
            self.special_only = false;
        }
        self
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `ship` passes every active predicate.
    pub fn matches(&self, ship: &NormalizedShip) -> bool {
        self.matches_with_query(ship, &normalized_query(&self.search_text))
    }

    /// `query` is the already trimmed and lowercased search text.
    fn matches_with_query(&self, ship: &NormalizedShip, query: &str) -> bool {
        (query.is_empty() || ship.display_name.to_lowercase().contains(query))
            && (self.nations.is_empty() || self.nations.contains(&ship.nation))
            && (self.types.is_empty() || self.types.contains(&ship.ship_type))
            && (self.tiers.is_empty() || self.tiers.contains(&ship.tier))
            && (!self.premium_only || ship.is_premium)
            && (!self.special_only || ship.is_special)
    }
}

fn normalized_query(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Ships in `items` that pass `state`, in their original order.
pub fn filter<T>(items: &[T], state: &FilterState) -> Vec<T>
where
    T: Borrow<NormalizedShip> + Clone,
{
    let query = normalized_query(&state.search_text);
    items
        .iter()
        .filter(|item| {
            let ship = <T as Borrow<NormalizedShip>>::borrow(*item);
            state.matches_with_query(ship, &query)
        })
        .cloned()
        .collect()
}
