//! View-state coordinator: owns the loaded dataset plus filter and sort
//! state, and keeps the derived view in step with them.
//!
//! ```text
//! Idle ──load──▶ Loading ──ok──▶ Ready ◀──┐ (filter/sort mutation)
//!                   │                └────┘
//!                   └──err──▶ Failed ──retry──▶ Loading
//! ```
//!
//! Normalization runs once per successful load. Every mutation reruns
//! filter then sort over the cached normalized list; the view is replaced
//! wholesale, never patched.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::filter::{FilterState, filter};
use super::normalize::normalize;
use super::sort::{SortDirection, SortKey, SortState, sort};
use super::source::CatalogSource;
use super::types::{NormalizedShip, ShipType};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

pub struct Catalog<S> {
    source: S,
    state: CatalogState,
    ships: Vec<Arc<NormalizedShip>>,
    view: Vec<Arc<NormalizedShip>>,
    filters: FilterState,
    sort: SortState,
    last_error: Option<String>,
    generation: u64,
}

impl<S: CatalogSource> Catalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: CatalogState::Idle,
            ships: Vec::new(),
            view: Vec::new(),
            filters: FilterState::default(),
            sort: SortState::default(),
            last_error: None,
            generation: 0,
        }
    }

    /// Fetch and normalize a fresh dataset.
    ///
    /// On failure the previous dataset, if any, stays in place (state
    /// returns to `Ready` and the error is kept in [`last_error`]);
    /// without one the state becomes `Failed`.
    ///
    /// [`last_error`]: Self::last_error
    pub async fn load(&mut self) -> Result<()> {
        self.state = CatalogState::Loading;
        info!("loading catalog");

        match self.source.fetch_bundle().await {
            Ok(bundle) => {
                self.ships = normalize(&bundle).into_iter().map(Arc::new).collect();
                self.generation += 1;
                self.last_error = None;
                self.recompute();
                self.state = CatalogState::Ready;
                info!(
                    ships = self.ships.len(),
                    generation = self.generation,
                    "catalog ready"
                );
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "catalog load failed");
                self.last_error = Some(message.clone());
                self.state = if self.generation > 0 {
                    CatalogState::Ready
                } else {
                    CatalogState::Failed { message }
                };
                Err(e)
            }
        }
    }

    /// Load again after a failure.
    pub async fn retry(&mut self) -> Result<()> {
        self.load().await
    }
}

impl<S> Catalog<S> {
    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// The filtered, sorted ships. A fresh snapshot after every mutation.
    pub fn view(&self) -> &[Arc<NormalizedShip>] {
        &self.view
    }

    /// Ships in the view.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Ships in the loaded dataset, before filtering.
    pub fn total(&self) -> usize {
        self.ships.len()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of datasets normalized so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Nation codes in the dataset with their display names, ordered by code.
    pub fn nations(&self) -> Vec<(String, String)> {
        self.ships
            .iter()
            .map(|s| (s.nation.clone(), s.nation_display.clone()))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect()
    }

    /// Ship types in the dataset with their display names, in priority order.
    pub fn types(&self) -> Vec<(ShipType, String)> {
        self.ships
            .iter()
            .map(|s| (s.ship_type, s.type_display.clone()))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect()
    }

    pub fn tiers(&self) -> BTreeSet<u32> {
        self.ships.iter().map(|s| s.tier).collect()
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.filters.set_search_text(text);
        self.recompute();
    }

    pub fn toggle_nation(&mut self, nation: &str) {
        self.filters.toggle_nation(nation);
        self.recompute();
    }

    pub fn toggle_type(&mut self, ship_type: ShipType) {
        self.filters.toggle_type(ship_type);
        self.recompute();
    }

    pub fn toggle_tier(&mut self, tier: u32) {
        self.filters.toggle_tier(tier);
        self.recompute();
    }

    pub fn set_premium_only(&mut self, on: bool) {
        self.filters.set_premium_only(on);
        self.recompute();
    }

    pub fn set_special_only(&mut self, on: bool) {
        self.filters.set_special_only(on);
        self.recompute();
    }

    pub fn toggle_premium_only(&mut self) {
        self.filters.toggle_premium_only();
        self.recompute();
    }

    pub fn toggle_special_only(&mut self) {
        self.filters.toggle_special_only();
        self.recompute();
    }

    /// Reset every filter. Sort state is kept.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
    }

    /// Replace the whole filter state at once. If both premium-only and
    /// special-only are set, special-only is dropped.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters.normalized();
        self.recompute();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort.key = key;
        self.recompute();
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort.direction = direction;
        self.recompute();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort.direction = self.sort.direction.reversed();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.view = sort(&filter(&self.ships, &self.filters), self.sort);
        debug!(
            visible = self.view.len(),
            total = self.ships.len(),
            "catalog view recomputed"
        );
    }
}
