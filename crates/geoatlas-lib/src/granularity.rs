//! Location granularity classification and render defaults.
//!
//! Geocoders tag resolved locations with a free-text type (for example
//! "PointAddress" or "Locality"). This module folds those tags into a small
//! granularity enum and picks a sensible default zoom and style for each,
//! so a country renders as an overview while a street address renders at
//! street level.

use serde::{Deserialize, Serialize};

use crate::style::MapStyle;

/// Geographic specificity of a resolved location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationGranularity {
    Country,
    City,
    Address,
    Unknown,
}

/// Default rendering parameters derived from a granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderDefaults {
    pub zoom: u8,
    pub style: MapStyle,
}

const COUNTRY_TAGS: &[&str] = &["country", "admin1", "state", "province"];
const ADDRESS_TAGS: &[&str] = &[
    "streetaddress",
    "pointaddress",
    "buildingname",
    "street",
    "address",
];
const CITY_TAGS: &[&str] = &["locality", "populated place", "admindivision3"];

/// Classify a geocoder location-type tag.
///
/// Matching is case-insensitive against fixed tag sets. Anything
/// unrecognised — including an empty tag — classifies as [`City`], not
/// [`Unknown`]: geocoders emit a long tail of locality-like tags and
/// city-level defaults are the safe middle ground. This lenient fallback is
/// deliberate, observed behavior; do not tighten it without confirming
/// callers can handle an `Unknown` outcome.
///
/// [`City`]: LocationGranularity::City
/// [`Unknown`]: LocationGranularity::Unknown
pub fn classify(location_type_tag: &str) -> LocationGranularity {
    let tag = location_type_tag.trim().to_ascii_lowercase();

    if COUNTRY_TAGS.contains(&tag.as_str()) {
        return LocationGranularity::Country;
    }
    if ADDRESS_TAGS.contains(&tag.as_str()) {
        return LocationGranularity::Address;
    }
    if CITY_TAGS.contains(&tag.as_str()) {
        return LocationGranularity::City;
    }

    // Lenient fallback for the long tail of locality-like tags.
    LocationGranularity::City
}

/// Default (zoom, style) pair for a granularity.
///
/// `Unknown` is not produced by [`classify`] today but maps to city-level
/// defaults should it ever be introduced.
pub fn defaults_for(granularity: LocationGranularity) -> RenderDefaults {
    match granularity {
        LocationGranularity::Country => RenderDefaults {
            zoom: 4,
            style: MapStyle::World,
        },
        LocationGranularity::Address => RenderDefaults {
            zoom: 16,
            style: MapStyle::Navigation,
        },
        LocationGranularity::City | LocationGranularity::Unknown => RenderDefaults {
            zoom: 11,
            style: MapStyle::Navigation,
        },
    }
}

/// Human-readable description of a map zoom level, following standard web
/// map conventions.
pub fn zoom_description(zoom: u8) -> &'static str {
    match zoom {
        0 => "World view",
        1..=2 => "Continental view",
        3..=4 => "Country view",
        5..=6 => "State/Province view",
        7..=8 => "Regional view",
        9 => "Metropolitan area",
        10..=11 => "City view",
        12..=13 => "Town view",
        14..=15 => "Neighborhood",
        16..=17 => "Street level",
        18..=19 => "Building level",
        20..=21 => "Building detail",
        _ => "Maximum detail",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_tags_classify_as_country() {
        for tag in ["Country", "Admin1", "State", "Province"] {
            assert_eq!(classify(tag), LocationGranularity::Country, "tag {tag}");
        }
    }

    #[test]
    fn address_tags_classify_as_address() {
        for tag in [
            "StreetAddress",
            "PointAddress",
            "BuildingName",
            "Street",
            "Address",
        ] {
            assert_eq!(classify(tag), LocationGranularity::Address, "tag {tag}");
        }
    }

    #[test]
    fn city_tags_classify_as_city() {
        for tag in ["Locality", "Populated Place", "AdminDivision3"] {
            assert_eq!(classify(tag), LocationGranularity::City, "tag {tag}");
        }
    }

    #[test]
    fn unrecognised_tags_fall_back_to_city() {
        assert_eq!(classify("bogus-tag"), LocationGranularity::City);
        assert_eq!(classify(""), LocationGranularity::City);
        assert_eq!(classify("   "), LocationGranularity::City);
    }

    #[test]
    fn defaults_match_the_documented_pairs() {
        let country = defaults_for(LocationGranularity::Country);
        assert_eq!((country.zoom, country.style), (4, MapStyle::World));

        let city = defaults_for(LocationGranularity::City);
        assert_eq!((city.zoom, city.style), (11, MapStyle::Navigation));

        let address = defaults_for(LocationGranularity::Address);
        assert_eq!((address.zoom, address.style), (16, MapStyle::Navigation));

        let unknown = defaults_for(LocationGranularity::Unknown);
        assert_eq!((unknown.zoom, unknown.style), (11, MapStyle::Navigation));
    }

    #[test]
    fn zoom_descriptions_cover_the_scale() {
        assert_eq!(zoom_description(0), "World view");
        assert_eq!(zoom_description(4), "Country view");
        assert_eq!(zoom_description(11), "City view");
        assert_eq!(zoom_description(16), "Street level");
        assert_eq!(zoom_description(22), "Maximum detail");
    }
}
