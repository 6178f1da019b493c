//! Basemap style vocabulary.
//!
//! Styles mirror the static basemap tile service's published catalogue,
//! grouped into the same five families, plus the `world` overview style used
//! for country-level rendering. Unknown style strings are rejected with
//! [`Error::UnsupportedStyle`] rather than silently defaulting, so a typo in
//! a caller-supplied style never produces the wrong map.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Family a basemap style belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCategory {
    Streets,
    Topography,
    Satellite,
    Reference,
    Creative,
}

/// A supported basemap rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapStyle {
    Navigation,
    NavigationNight,
    Streets,
    StreetsNight,
    Community,
    Outdoor,
    Oceans,
    Imagery,
    ImageryLabels,
    LightGray,
    DarkGray,
    HumanGeography,
    HumanGeographyDark,
    Nova,
    Midcentury,
    Newspaper,
    World,
}

impl MapStyle {
    /// All supported styles, in catalogue order.
    pub const ALL: [MapStyle; 17] = [
        MapStyle::Navigation,
        MapStyle::NavigationNight,
        MapStyle::Streets,
        MapStyle::StreetsNight,
        MapStyle::Community,
        MapStyle::Outdoor,
        MapStyle::Oceans,
        MapStyle::Imagery,
        MapStyle::ImageryLabels,
        MapStyle::LightGray,
        MapStyle::DarkGray,
        MapStyle::HumanGeography,
        MapStyle::HumanGeographyDark,
        MapStyle::Nova,
        MapStyle::Midcentury,
        MapStyle::Newspaper,
        MapStyle::World,
    ];

    /// The style name as used in tile service URL paths.
    pub fn as_str(self) -> &'static str {
        match self {
            MapStyle::Navigation => "navigation",
            MapStyle::NavigationNight => "navigation-night",
            MapStyle::Streets => "streets",
            MapStyle::StreetsNight => "streets-night",
            MapStyle::Community => "community",
            MapStyle::Outdoor => "outdoor",
            MapStyle::Oceans => "oceans",
            MapStyle::Imagery => "imagery",
            MapStyle::ImageryLabels => "imagery-labels",
            MapStyle::LightGray => "light-gray",
            MapStyle::DarkGray => "dark-gray",
            MapStyle::HumanGeography => "human-geography",
            MapStyle::HumanGeographyDark => "human-geography-dark",
            MapStyle::Nova => "nova",
            MapStyle::Midcentury => "midcentury",
            MapStyle::Newspaper => "newspaper",
            MapStyle::World => "world",
        }
    }

    /// Family this style belongs to.
    pub fn category(self) -> StyleCategory {
        match self {
            MapStyle::Navigation
            | MapStyle::NavigationNight
            | MapStyle::Streets
            | MapStyle::StreetsNight
            | MapStyle::Community => StyleCategory::Streets,
            MapStyle::Outdoor | MapStyle::Oceans => StyleCategory::Topography,
            MapStyle::Imagery | MapStyle::ImageryLabels => StyleCategory::Satellite,
            MapStyle::LightGray
            | MapStyle::DarkGray
            | MapStyle::HumanGeography
            | MapStyle::HumanGeographyDark
            | MapStyle::World => StyleCategory::Reference,
            MapStyle::Nova | MapStyle::Midcentury | MapStyle::Newspaper => StyleCategory::Creative,
        }
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapStyle {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let normalized = input.trim().to_ascii_lowercase();
        for style in MapStyle::ALL {
            if style.as_str() == normalized {
                return Ok(style);
            }
        }

        let suggestions = MapStyle::ALL
            .iter()
            .map(|style| style.as_str())
            .filter(|name| {
                !normalized.is_empty()
                    && (name.contains(normalized.as_str()) || normalized.contains(name))
            })
            .map(str::to_string)
            .collect();

        Err(Error::UnsupportedStyle {
            style: input.to_string(),
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_styles_case_insensitively() {
        assert_eq!("Navigation".parse::<MapStyle>().unwrap(), MapStyle::Navigation);
        assert_eq!("world".parse::<MapStyle>().unwrap(), MapStyle::World);
        assert_eq!(
            "imagery-labels".parse::<MapStyle>().unwrap(),
            MapStyle::ImageryLabels
        );
    }

    #[test]
    fn unknown_style_is_an_error_with_suggestions() {
        let err = "navigation-nite".parse::<MapStyle>().expect_err("typo");
        match err {
            Error::UnsupportedStyle { style, suggestions } => {
                assert_eq!(style, "navigation-nite");
                assert!(suggestions.is_empty() || suggestions.iter().all(|s| s.contains("nav")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_style_round_trips_through_its_name() {
        for style in MapStyle::ALL {
            assert_eq!(style.as_str().parse::<MapStyle>().unwrap(), style);
        }
    }

    #[test]
    fn categories_cover_the_published_families() {
        assert_eq!(MapStyle::Navigation.category(), StyleCategory::Streets);
        assert_eq!(MapStyle::Oceans.category(), StyleCategory::Topography);
        assert_eq!(MapStyle::Imagery.category(), StyleCategory::Satellite);
        assert_eq!(MapStyle::World.category(), StyleCategory::Reference);
        assert_eq!(MapStyle::Newspaper.category(), StyleCategory::Creative);
    }
}
