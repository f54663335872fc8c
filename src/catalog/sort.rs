//! Stable, direction-aware ordering of ships.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::types::NormalizedShip;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    #[default]
    Tier,
    Nation,
    Type,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Current ordering. Defaults to tier, ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Name => "name",
            SortKey::Tier => "tier",
            SortKey::Nation => "nation",
            SortKey::Type => "type",
        })
    }
}

impl FromStr for SortKey {
    type Err = String;

    /// Accepts `level` as an alias for `tier`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "tier" | "level" => Ok(SortKey::Tier),
            "nation" => Ok(SortKey::Nation),
            "type" => Ok(SortKey::Type),
            _ => Err(format!("unknown sort key: {s}")),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("unknown sort direction: {s}")),
        }
    }
}

/// Base letters of `s`, lowercased, with diacritics removed (`Ägir` → `agir`).
fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Collation for display strings.
///
/// Compares base letters first, ignoring case and accents. Ties are broken
/// by the case-folded text (unaccented before accented), then lowercase
/// before uppercase, then code-point order.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = primary_key(a).cmp(primary_key(b));
    let folded = || {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    };
    primary.then_with(folded).then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            })
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    })
}

/// Ascending comparator for `key`.
pub fn compare(a: &NormalizedShip, b: &NormalizedShip, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => collate(&a.display_name, &b.display_name),
        SortKey::Tier => a.tier.cmp(&b.tier),
        SortKey::Nation => collate(&a.nation_display, &b.nation_display),
        SortKey::Type => collate(&a.type_display, &b.type_display),
    }
}

/// A sorted copy of `items`. Equal elements keep their input order in
/// both directions.
pub fn sort<T>(items: &[T], state: SortState) -> Vec<T>
where
    T: Borrow<NormalizedShip> + Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(
            <T as Borrow<NormalizedShip>>::borrow(a),
            <T as Borrow<NormalizedShip>>::borrow(b),
            state.key,
        );
        match state.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}
