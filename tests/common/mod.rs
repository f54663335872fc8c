//! Shared encyclopedia fixtures.

#![allow(dead_code)]

use serde_json::{Value, json};

use drydock::catalog::{NormalizedShip, RawBundle, ShipType};

pub const MEDIA_PATH: &str = "//glossary-wows-global.gcdn.co/icons/";

pub fn vehicles_json() -> Value {
    json!({
        "3751753680": {
            "level": 10,
            "name": "PASB018_Montana_1945",
            "nation": "usa",
            "tags": ["Battleship"],
            "icons": {"medium": "vehicle/medium/PASB018.png"},
            "localization": {"mark": {"en": "Montana"}, "description": {"en": "Fast battleship."}}
        },
        "4181669872": {
            "level": 8,
            "name": "PASC208_Alaska",
            "nation": "usa",
            "tags": ["Cruiser", "premium"],
            "icons": {"default": "vehicle/default/PASC208.png"},
            "localization": {"mark": {"en": "Alaska"}}
        },
        "3763320816": {
            "level": 10,
            "name": "PJSB018_Yamato_1944",
            "nation": "japan",
            "tags": ["Battleship"],
            "icons": {"medium": "vehicle/medium/PJSB018.png"},
            "localization": {"mark": {"en": "Yamato"}}
        },
        "4074715088": {
            "level": 9,
            "name": "PJSD109_Kitakaze",
            "nation": "japan",
            "tags": ["Destroyer", "uiSpecial"],
            "icons": {},
            "localization": {"mark": {"en": "Kitakaze"}}
        },
        "3552556336": {
            "level": 11,
            "name": "PRSS510_Unknown",
            "nation": "ussr",
            "tags": ["Submarine", "special"],
            "localization": {}
        },
        "4293836784": {
            "level": 6,
            "name": "PZSA006_Test",
            "nation": "pan_asia",
            "tags": ["AirCarrier"],
            "localization": {"mark": {"en": "alpha"}}
        }
    })
}

pub fn nations_json() -> Value {
    json!([
        {"name": "usa", "id": 1, "localization": {"mark": {"en": "U.S.A."}}},
        {"name": "japan", "id": 2, "localization": {"mark": {"en": "Japan"}}},
        {"name": "ussr", "id": 3, "localization": {"mark": {"en": "U.S.S.R."}}}
    ])
}

pub fn vehicle_types_json() -> Value {
    json!({
        "Battleship": {"sort_order": 4, "localization": {"mark": {"en": "Battleship"}}},
        "Cruiser": {"sort_order": 3, "localization": {"mark": {"en": "Cruiser"}}},
        "Destroyer": {"sort_order": 2, "localization": {"mark": {"en": "Destroyer"}}},
        "Submarine": {"sort_order": 1, "localization": {"mark": {"en": "Submarine"}}}
    })
}

pub fn bundle() -> RawBundle {
    RawBundle {
        ships: serde_json::from_value(vehicles_json()).unwrap(),
        nations: serde_json::from_value(nations_json()).unwrap(),
        vehicle_types: serde_json::from_value(vehicle_types_json()).unwrap(),
        media_path: MEDIA_PATH.to_string(),
    }
}

/// Minimal normalized ship for filter and sort tests.
pub fn ship(id: &str, name: &str, tier: u32) -> NormalizedShip {
    NormalizedShip {
        id: id.to_string(),
        name: format!("P{id}_{name}"),
        display_name: name.to_string(),
        description: String::new(),
        tier,
        nation: "usa".to_string(),
        nation_display: "U.S.A.".to_string(),
        ship_type: ShipType::Cruiser,
        type_display: "Cruiser".to_string(),
        tags: Default::default(),
        icon_url: String::new(),
        is_premium: false,
        is_special: false,
    }
}

pub fn names<T: std::borrow::Borrow<NormalizedShip>>(ships: &[T]) -> Vec<&str> {
    ships
        .iter()
        .map(|s| <T as std::borrow::Borrow<NormalizedShip>>::borrow(s).display_name.as_str())
        .collect()
}
