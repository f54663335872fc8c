//! Upstream record shapes and the normalized ship view model.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locale code → display string.
pub type Localized = HashMap<String, String>;

/// Locale used for every display string.
pub const DISPLAY_LOCALE: &str = "en";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    #[serde(default)]
    pub mark: Localized,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortmark: Option<Localized>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized>,
}

impl Localization {
    /// English mark, if present and non-empty.
    pub fn mark_en(&self) -> Option<&str> {
        non_empty(self.mark.get(DISPLAY_LOCALE))
    }

    pub fn description_en(&self) -> Option<&str> {
        non_empty(self.description.as_ref()?.get(DISPLAY_LOCALE))
    }
}

fn non_empty(s: Option<&String>) -> Option<&str> {
    s.map(String::as_str).filter(|s| !s.is_empty())
}

/// Icon paths, relative to the media base path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Icons {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawShip {
    #[serde(default)]
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub nation: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icons: Icons,
    #[serde(default)]
    pub localization: Localization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNation {
    pub name: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub color: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icons: Icons,
    #[serde(default)]
    pub localization: Localization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVehicleType {
    #[serde(default)]
    pub icons: Icons,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub localization: Localization,
}

/// Everything one load cycle fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBundle {
    /// Ship id → record.
    pub ships: BTreeMap<String, RawShip>,
    pub nations: Vec<RawNation>,
    /// Type code (e.g. `Cruiser`) → record.
    pub vehicle_types: HashMap<String, RawVehicleType>,
    /// Prefix for every icon path.
    pub media_path: String,
}

/// Ship class derived from tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipType {
    Submarine,
    Destroyer,
    Cruiser,
    Battleship,
    AirCarrier,
    Unknown,
}

impl ShipType {
    /// Known classes in tag-matching priority order.
    pub const KNOWN: [ShipType; 5] = [
        ShipType::Submarine,
        ShipType::Destroyer,
        ShipType::Cruiser,
        ShipType::Battleship,
        ShipType::AirCarrier,
    ];

    /// The upstream tag / vehicle-type key for this class.
    pub fn as_str(self) -> &'static str {
        match self {
            ShipType::Submarine => "Submarine",
            ShipType::Destroyer => "Destroyer",
            ShipType::Cruiser => "Cruiser",
            ShipType::Battleship => "Battleship",
            ShipType::AirCarrier => "AirCarrier",
            ShipType::Unknown => "Unknown",
        }
    }

    /// First known class (by priority) present in `tags`, else `Unknown`.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> ShipType {
        Self::KNOWN
            .into_iter()
            .find(|ty| tags.iter().any(|t| t.as_ref() == ty.as_str()))
            .unwrap_or(ShipType::Unknown)
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = String;

    /// Case-insensitive; accepts `carrier` as an alias for `AirCarrier`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if lower == "carrier" {
            return Ok(ShipType::AirCarrier);
        }
        Self::KNOWN
            .into_iter()
            .chain([ShipType::Unknown])
            .find(|ty| ty.as_str().to_ascii_lowercase() == lower)
            .ok_or_else(|| format!("unknown ship type: {s}"))
    }
}

/// Flat view-model record derived from a [`RawShip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedShip {
    pub id: String,
    /// Upstream internal name, e.g. `PASB017_Montana_1945`.
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub tier: u32,
    pub nation: String,
    pub nation_display: String,
    pub ship_type: ShipType,
    pub type_display: String,
    pub tags: BTreeSet<String>,
    pub icon_url: String,
    pub is_premium: bool,
    pub is_special: bool,
}
