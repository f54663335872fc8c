//! Raw upstream records → [`NormalizedShip`] list.
//!
//! Missing lookups never fail or drop a record: nation and type display
//! names fall back to their codes, the display name falls back to the
//! internal name, and a missing description becomes the empty string.

use std::collections::HashMap;

use super::types::{NormalizedShip, RawBundle, RawNation, RawShip, RawVehicleType, ShipType};

const PREMIUM_TAG: &str = "premium";
const SPECIAL_TAGS: [&str; 2] = ["special", "uiSpecial"];

/// Normalize every ship in `bundle`, in ascending id order.
pub fn normalize(bundle: &RawBundle) -> Vec<NormalizedShip> {
    let nations = nation_names(&bundle.nations);

    bundle
        .ships
        .iter()
        .map(|(id, ship)| {
            normalize_ship(
                id,
                ship,
                &nations,
                &bundle.vehicle_types,
                &bundle.media_path,
            )
        })
        .collect()
}

/// Normalize a single ship against prebuilt lookup tables.
pub fn normalize_ship(
    id: &str,
    ship: &RawShip,
    nations: &HashMap<&str, &str>,
    vehicle_types: &HashMap<String, RawVehicleType>,
    media_path: &str,
) -> NormalizedShip {
    let ship_type = ShipType::from_tags(&ship.tags);
    let type_display = vehicle_types
        .get(ship_type.as_str())
        .and_then(|t| t.localization.mark_en())
        .unwrap_or(ship_type.as_str())
        .to_string();
    let nation_display = nations
        .get(ship.nation.as_str())
        .copied()
        .unwrap_or(&ship.nation)
        .to_string();
    let icon = ship
        .icons
        .medium
        .as_deref()
        .or(ship.icons.default.as_deref())
        .unwrap_or_default();

    NormalizedShip {
        id: id.to_string(),
        name: ship.name.clone(),
        display_name: ship
            .localization
            .mark_en()
            .unwrap_or(&ship.name)
            .to_string(),
        description: ship
            .localization
            .description_en()
            .unwrap_or_default()
            .to_string(),
        tier: ship.level,
        nation: ship.nation.clone(),
        nation_display,
        ship_type,
        type_display,
        tags: ship.tags.iter().cloned().collect(),
        icon_url: format!("{media_path}{icon}"),
        is_premium: ship.tags.iter().any(|t| t == PREMIUM_TAG),
        is_special: ship.tags.iter().any(|t| SPECIAL_TAGS.contains(&t.as_str())),
    }
}

/// Nation code → English display name, for nations that have one.
pub fn nation_names(nations: &[RawNation]) -> HashMap<&str, &str> {
    nations
        .iter()
        .filter_map(|n| Some((n.name.as_str(), n.localization.mark_en()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{Icons, Localization};

    fn ship(tags: &[&str]) -> RawShip {
        RawShip {
            level: 8,
            name: "PASC008_Baltimore".into(),
            nation: "usa".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            icons: Icons {
                medium: Some("/ships/baltimore.png".into()),
                ..Default::default()
            },
            localization: Localization::default(),
        }
    }

    #[test]
    fn premium_and_special_are_independent() {
        let s = normalize_ship(
            "1",
            &ship(&["premium", "uiSpecial", "Cruiser"]),
            &HashMap::new(),
            &HashMap::new(),
            "",
        );
        assert!(s.is_premium);
        assert!(s.is_special);
    }

    #[test]
    fn icon_url_prefixes_media_path() {
        let s = normalize_ship("1", &ship(&[]), &HashMap::new(), &HashMap::new(), "//cdn/");
        assert_eq!(s.icon_url, "//cdn//ships/baltimore.png");
    }

    #[test]
    fn unknown_type_displays_its_code() {
        let s = normalize_ship("1", &ship(&["premium"]), &HashMap::new(), &HashMap::new(), "");
        assert_eq!(s.ship_type, ShipType::Unknown);
        assert_eq!(s.type_display, "Unknown");
    }
}
