//! MCP resource implementations for service metadata
//!
//! This module defines the three resources exposed by the MCP server:
//! - geoatlas://styles: Supported basemap styles grouped by family
//! - geoatlas://zoom-levels: Zoom scale with human-readable descriptions
//! - geoatlas://categories/status: Category cache size and degradation state

use serde::Serialize;
use serde_json::json;

use geoatlas_lib::{zoom_description, MapStyle, MAX_ZOOM};

use crate::server::ServerState;
use crate::Result;

/// Basemap styles resource
///
/// Returns the full style catalogue with each style's URL name and family.
pub struct StylesResource;

impl StylesResource {
    /// Handle a styles resource read
    pub async fn read() -> Result<String> {
        #[derive(Serialize)]
        struct Style {
            name: &'static str,
            category: String,
        }

        let styles: Vec<Style> = MapStyle::ALL
            .iter()
            .map(|style| Style {
                name: style.as_str(),
                category: serde_json::to_value(style.category())
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
            })
            .collect();

        let payload = json!({
            "styles": styles,
            "count": styles.len(),
        });

        serde_json::to_string(&payload).map_err(|e| crate::Error::internal(e.to_string()))
    }
}

/// Zoom levels resource
///
/// Returns every supported zoom level with its description, so callers can
/// pick a zoom by intent ("City view") rather than by number.
pub struct ZoomLevelsResource;

impl ZoomLevelsResource {
    /// Handle a zoom levels resource read
    pub async fn read() -> Result<String> {
        #[derive(Serialize)]
        struct ZoomLevel {
            zoom: u8,
            description: &'static str,
        }

        let levels: Vec<ZoomLevel> = (0..=MAX_ZOOM)
            .map(|zoom| ZoomLevel {
                zoom,
                description: zoom_description(zoom),
            })
            .collect();

        let payload = json!({
            "levels": levels,
            "min": 0,
            "max": MAX_ZOOM,
        });

        serde_json::to_string(&payload).map_err(|e| crate::Error::internal(e.to_string()))
    }
}

/// Category cache status resource
///
/// Returns the cached vocabulary size and whether the last load failed.
pub struct CategoryStatusResource;

impl CategoryStatusResource {
    /// Handle a category status resource read
    pub async fn read(state: &ServerState) -> Result<String> {
        let payload = json!({
            "category_count": state.categories.entry_count(),
            "degraded": state.categories.is_degraded(),
            "initialized_at": state.initialized_at.to_rfc3339(),
        });

        serde_json::to_string(&payload).map_err(|e| crate::Error::internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use geoatlas_lib::{CategoryEntry, CategorySource, Geocoder, ResolvedLocation};

    struct NoopGeocoder;

    impl Geocoder for NoopGeocoder {
        fn geocode(&self, _query: &str) -> geoatlas_lib::Result<Option<ResolvedLocation>> {
            Ok(None)
        }
    }

    struct EmptyCategories;

    impl CategorySource for EmptyCategories {
        fn fetch_categories(&self) -> geoatlas_lib::Result<Vec<CategoryEntry>> {
            Ok(vec![])
        }
    }

    fn test_state() -> ServerState {
        ServerState::with_collaborators(Arc::new(NoopGeocoder), Arc::new(EmptyCategories))
    }

    #[tokio::test]
    async fn test_styles_resource() {
        let json = StylesResource::read().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 17);
        let styles = value["styles"].as_array().unwrap();
        assert!(styles.iter().any(|s| s["name"] == "navigation"));
        assert!(styles
            .iter()
            .any(|s| s["name"] == "world" && s["category"] == "reference"));
    }

    #[tokio::test]
    async fn test_zoom_levels_resource() {
        let json = ZoomLevelsResource::read().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["max"], 22);
        let levels = value["levels"].as_array().unwrap();
        assert_eq!(levels.len(), 23);
        assert_eq!(levels[0]["description"], "World view");
        assert_eq!(levels[11]["description"], "City view");
    }

    #[tokio::test]
    async fn test_category_status_resource() {
        let state = test_state();
        let json = CategoryStatusResource::read(&state).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["category_count"], 0);
        assert_eq!(value["degraded"], false);
        assert!(value["initialized_at"].is_string());
    }
}
