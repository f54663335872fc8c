//! View-state coordinator: load lifecycle and derived view consistency.

mod common;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use drydock::catalog::{
    Catalog, CatalogSource, CatalogState, FilterState, RawBundle, ShipType, SortDirection,
    SortKey,
};
use drydock::{DrydockError, Result, UpstreamError};

use common::{bundle, names};

/// Source that replays a fixed sequence of load outcomes.
struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<RawBundle>>>,
}

impl ScriptedSource {
    fn new(outcomes: Vec<Result<RawBundle>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch_bundle(&self) -> Result<RawBundle> {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DrydockError::Http("no more outcomes".into())))
    }
}

fn two_ship_bundle() -> RawBundle {
    RawBundle {
        ships: serde_json::from_value(json!({
            "1": {"level": 9, "name": "PASB_One", "nation": "usa", "tags": ["premium", "Battleship"],
                  "localization": {"mark": {"en": "One"}}},
            "2": {"level": 10, "name": "PJSB_Two", "nation": "japan", "tags": ["Battleship"],
                  "localization": {"mark": {"en": "Two"}}}
        }))
        .unwrap(),
        ..Default::default()
    }
}

fn unreachable() -> DrydockError {
    DrydockError::Upstream(UpstreamError::Network("connection refused".into()))
}

async fn ready_catalog() -> Catalog<ScriptedSource> {
    let mut catalog = Catalog::new(ScriptedSource::new(vec![Ok(bundle())]));
    catalog.load().await.unwrap();
    catalog
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn starts_idle_and_empty() {
    let catalog = Catalog::new(ScriptedSource::new(vec![]));
    assert_eq!(catalog.state(), &CatalogState::Idle);
    assert!(catalog.is_empty());
    assert_eq!(catalog.total(), 0);
    assert_eq!(catalog.generation(), 0);
}

#[tokio::test]
async fn successful_load_is_ready_and_sorted_by_tier() {
    let catalog = ready_catalog().await;
    assert_eq!(catalog.state(), &CatalogState::Ready);
    assert_eq!(catalog.total(), 6);
    assert_eq!(catalog.len(), 6);
    assert!(catalog.last_error().is_none());

    let tiers: Vec<u32> = catalog.view().iter().map(|s| s.tier).collect();
    assert_eq!(tiers, [6, 8, 9, 10, 10, 11]);
}

#[tokio::test]
async fn first_load_failure_is_failed() {
    let mut catalog = Catalog::new(ScriptedSource::new(vec![Err(unreachable())]));

    let err = catalog.load().await.unwrap_err();
    assert!(err.is_transient());
    match catalog.state() {
        CatalogState::Failed { message } => assert!(message.contains("connection refused")),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn retry_after_failure_recovers() {
    let mut catalog = Catalog::new(ScriptedSource::new(vec![Err(unreachable()), Ok(bundle())]));

    assert!(catalog.load().await.is_err());
    catalog.retry().await.unwrap();

    assert_eq!(catalog.state(), &CatalogState::Ready);
    assert_eq!(catalog.total(), 6);
    assert!(catalog.last_error().is_none());
}

#[tokio::test]
async fn reload_failure_keeps_previous_dataset() {
    let mut catalog = Catalog::new(ScriptedSource::new(vec![Ok(bundle()), Err(unreachable())]));
    catalog.load().await.unwrap();
    catalog.toggle_type(ShipType::Battleship);
    let before: Vec<String> = catalog.view().iter().map(|s| s.id.clone()).collect();

    assert!(catalog.load().await.is_err());

    assert_eq!(catalog.state(), &CatalogState::Ready);
    assert!(catalog.last_error().unwrap().contains("connection refused"));
    let after: Vec<String> = catalog.view().iter().map(|s| s.id.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(catalog.total(), 6);
    assert_eq!(catalog.generation(), 1);
}

#[tokio::test]
async fn reload_replaces_dataset_and_keeps_filters() {
    let mut catalog = Catalog::new(ScriptedSource::new(vec![
        Ok(bundle()),
        Ok(two_ship_bundle()),
    ]));
    catalog.load().await.unwrap();
    catalog.toggle_nation("japan");

    catalog.load().await.unwrap();
    assert_eq!(catalog.total(), 2);
    assert_eq!(names(catalog.view()), ["Two"]);
    assert_eq!(catalog.generation(), 2);
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn premium_only_then_clear_filters() {
    let mut catalog = Catalog::new(ScriptedSource::new(vec![Ok(two_ship_bundle())]));
    catalog.load().await.unwrap();

    catalog.set_premium_only(true);
    assert_eq!(names(catalog.view()), ["One"]);

    catalog.clear_filters();
    assert_eq!(names(catalog.view()), ["One", "Two"]);
    let tiers: Vec<u32> = catalog.view().iter().map(|s| s.tier).collect();
    assert_eq!(tiers, [9, 10]);
}

#[tokio::test]
async fn premium_and_special_toggles_are_exclusive() {
    let mut catalog = ready_catalog().await;

    catalog.toggle_special_only();
    catalog.toggle_premium_only();
    assert!(catalog.filters().premium_only);
    assert!(!catalog.filters().special_only);
    assert_eq!(names(catalog.view()), ["Alaska"]);

    catalog.set_special_only(true);
    assert!(!catalog.filters().premium_only);
    assert_eq!(catalog.len(), 2);
}

#[tokio::test]
async fn set_filters_keeps_premium_when_both_flags_set() {
    let mut catalog = ready_catalog().await;

    catalog.set_filters(FilterState {
        premium_only: true,
        special_only: true,
        ..Default::default()
    });
    assert!(catalog.filters().premium_only);
    assert!(!catalog.filters().special_only);
    assert_eq!(names(catalog.view()), ["Alaska"]);
}

#[tokio::test]
async fn filters_combine_across_mutations() {
    let mut catalog = ready_catalog().await;

    catalog.toggle_tier(10);
    assert_eq!(catalog.len(), 2);

    catalog.toggle_nation("usa");
    assert_eq!(names(catalog.view()), ["Montana"]);

    catalog.set_search_text("yam");
    assert!(catalog.is_empty());

    catalog.toggle_nation("usa");
    assert_eq!(names(catalog.view()), ["Yamato"]);
}

#[tokio::test]
async fn sort_mutations_reorder_view() {
    let mut catalog = ready_catalog().await;

    catalog.set_sort_key(SortKey::Name);
    assert_eq!(catalog.view()[0].display_name, "Alaska");

    catalog.toggle_sort_direction();
    assert_eq!(catalog.sort_state().direction, SortDirection::Descending);
    assert_eq!(catalog.view()[0].display_name, "Yamato");

    catalog.set_sort_direction(SortDirection::Ascending);
    catalog.set_sort_key(SortKey::Tier);
    assert_eq!(catalog.view()[0].tier, 6);
}

#[tokio::test]
async fn clear_filters_keeps_sort() {
    let mut catalog = ready_catalog().await;
    catalog.set_sort_key(SortKey::Name);
    catalog.toggle_tier(10);

    catalog.clear_filters();
    assert_eq!(catalog.sort_state().key, SortKey::Name);
    assert_eq!(catalog.len(), 6);
}

#[tokio::test]
async fn mutations_never_renormalize() {
    let mut catalog = ready_catalog().await;
    catalog.toggle_tier(8);
    catalog.set_search_text("a");
    catalog.set_sort_key(SortKey::Nation);
    catalog.toggle_sort_direction();
    catalog.clear_filters();
    assert_eq!(catalog.generation(), 1);
}

#[tokio::test]
async fn mutations_before_load_are_kept() {
    let mut catalog = Catalog::new(ScriptedSource::new(vec![Ok(bundle())]));
    catalog.toggle_type(ShipType::Destroyer);
    assert!(catalog.is_empty());

    catalog.load().await.unwrap();
    assert_eq!(names(catalog.view()), ["Kitakaze"]);
}

// =============================================================================
// Facets
// =============================================================================

#[tokio::test]
async fn facets_list_loaded_values() {
    let catalog = ready_catalog().await;

    let nations = catalog.nations();
    let codes: Vec<&str> = nations.iter().map(|(code, _)| code.as_str()).collect();
    assert_eq!(codes, ["japan", "pan_asia", "usa", "ussr"]);
    assert_eq!(nations[2].1, "U.S.A.");

    let types: Vec<ShipType> = catalog.types().into_iter().map(|(t, _)| t).collect();
    assert_eq!(
        types,
        [
            ShipType::Submarine,
            ShipType::Destroyer,
            ShipType::Cruiser,
            ShipType::Battleship,
            ShipType::AirCarrier
        ]
    );

    assert_eq!(catalog.tiers().into_iter().collect::<Vec<_>>(), [6, 8, 9, 10, 11]);
}
