//! MCP tool implementations for map rendering and tile queries
//!
//! This module defines the three main tools exposed by the MCP server:
//! - render_map: Render a static map for a place name or coordinate pair
//! - tile_coverage: Resolve the tile set covering a bounding box
//! - list_place_categories: Query the cached place-category vocabulary

use std::sync::Arc;

use tracing::{debug, info, warn};

use geoatlas_lib::{
    classify, defaults_for, resolve_coverage_capped, zoom_description, BoundingBox, GeoPoint,
    LocationGranularity, MapStyle, RenderSpec, DEFAULT_MAX_COVERAGE_TILES,
};

use crate::server::ServerState;
use crate::types::*;
use crate::Error;

/// Map rendering tool handler
///
/// Accepts either a free-text location (geocoded to a coordinate) or an
/// explicit coordinate pair, applies granularity-based defaults for any
/// omitted zoom/style, and returns the full artifact bundle. Geocoding
/// failures degrade to a text-only response instead of erroring, so the
/// caller always receives a displayable summary.
pub struct RenderMapTool;

enum CenterResolution {
    Resolved {
        center: GeoPoint,
        granularity: Option<LocationGranularity>,
        matched_address: Option<String>,
        score: Option<f64>,
    },
    Unresolved {
        query: String,
        reason: String,
    },
}

impl RenderMapTool {
    /// Handle a map rendering request
    pub async fn execute(state: &ServerState, input: RenderMapInput) -> crate::Result<RenderMapOutput> {
        info!(
            location = input.location.as_deref().unwrap_or("<coordinates>"),
            zoom = ?input.zoom,
            style = ?input.style,
            "Rendering map"
        );

        let style_override = match &input.style {
            Some(raw) => Some(raw.parse::<MapStyle>().map_err(Error::from)?),
            None => None,
        };

        let (center, granularity, matched_address, score) =
            match Self::resolve_center(state, &input).await? {
                CenterResolution::Resolved {
                    center,
                    granularity,
                    matched_address,
                    score,
                } => (center, granularity, matched_address, score),
                CenterResolution::Unresolved { query, reason } => {
                    warn!(%query, %reason, "map rendering degraded");
                    let outcome = state.assembler.assemble_unresolved(&query, &reason);
                    let bundle = outcome.bundle();
                    return Ok(RenderMapOutput {
                        success: false,
                        summary: bundle.summary.clone(),
                        map: None,
                        error: Some(ToolError {
                            code: "LOCATION_NOT_FOUND".to_string(),
                            message: reason,
                            suggestions: vec![
                                "Try a more specific place name".to_string(),
                                "Supply latitude and longitude directly".to_string(),
                            ],
                        }),
                    });
                }
            };

        let defaults = defaults_for(granularity.unwrap_or(LocationGranularity::Unknown));
        let spec = RenderSpec {
            center,
            zoom: input.zoom.unwrap_or(defaults.zoom as i32),
            style: style_override.unwrap_or(defaults.style),
            label: matched_address.clone(),
            score,
        };
        let zoom = spec.effective_zoom();
        let bundle = state.assembler.assemble(&spec);

        let tile = bundle
            .tile
            .ok_or_else(|| Error::internal("assembled bundle is missing its tile"))?;
        let tile_url = bundle
            .tile_url
            .ok_or_else(|| Error::internal("assembled bundle is missing its tile URL"))?;

        Ok(RenderMapOutput {
            success: true,
            summary: bundle.summary,
            map: Some(MapDetails {
                center: Coordinates {
                    latitude: center.latitude,
                    longitude: center.longitude,
                },
                zoom,
                zoom_description: zoom_description(zoom).to_string(),
                style: spec.style.to_string(),
                granularity: granularity.map(|g| granularity_label(g).to_string()),
                matched_address,
                score,
                tile_coordinates: TileCoordinates {
                    x: tile.x,
                    y: tile.y,
                    z: tile.z,
                },
                tile_url,
                alternate_provider_urls: bundle.provider_urls,
                embed_markup: bundle.embed_markup,
            }),
            error: None,
        })
    }

    /// Resolve the map center from the input's coordinate pair or free-text
    /// location. Exactly one of the two forms must be supplied.
    async fn resolve_center(
        state: &ServerState,
        input: &RenderMapInput,
    ) -> crate::Result<CenterResolution> {
        match (input.latitude, input.longitude) {
            (Some(latitude), Some(longitude)) => {
                let center = GeoPoint::new(latitude, longitude).map_err(Error::from)?;
                return Ok(CenterResolution::Resolved {
                    center,
                    granularity: None,
                    matched_address: None,
                    score: None,
                });
            }
            (Some(_), None) => {
                return Err(Error::invalid_param("longitude", "Required when latitude is set"))
            }
            (None, Some(_)) => {
                return Err(Error::invalid_param("latitude", "Required when longitude is set"))
            }
            (None, None) => {}
        }

        let query = match input.location.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => query.to_string(),
            _ => {
                return Err(Error::invalid_param(
                    "location",
                    "Either location or latitude+longitude is required",
                ))
            }
        };

        let geocoder = Arc::clone(&state.geocoder);
        let task_query = query.clone();
        let resolved = tokio::task::spawn_blocking(move || geocoder.geocode(&task_query))
            .await
            .map_err(|e| Error::internal(e.to_string()))?;

        match resolved {
            Ok(Some(location)) => {
                debug!(
                    address = %location.formatted_address,
                    location_type = %location.location_type,
                    "geocoded location"
                );
                Ok(CenterResolution::Resolved {
                    center: location.point,
                    granularity: Some(classify(&location.location_type)),
                    matched_address: Some(location.formatted_address),
                    score: Some(location.score),
                })
            }
            Ok(None) => Ok(CenterResolution::Unresolved {
                query,
                reason: "no geocoding results found".to_string(),
            }),
            Err(error) => Ok(CenterResolution::Unresolved {
                query,
                reason: format!("geocoding service failed: {error}"),
            }),
        }
    }
}

fn granularity_label(granularity: LocationGranularity) -> &'static str {
    match granularity {
        LocationGranularity::Country => "country",
        LocationGranularity::City => "city",
        LocationGranularity::Address => "address",
        LocationGranularity::Unknown => "unknown",
    }
}

/// Tile coverage tool handler
///
/// Resolves the row-major tile set covering a bounding box at a zoom
/// level. Boxes spanning the antimeridian are supported; oversized
/// requests are rejected with the requested and maximum counts rather
/// than truncated.
pub struct TileCoverageTool;

impl TileCoverageTool {
    /// Handle a tile coverage request
    pub async fn execute(input: TileCoverageInput) -> crate::Result<TileCoverageOutput> {
        debug!(
            west = input.west,
            south = input.south,
            east = input.east,
            north = input.north,
            zoom = input.zoom,
            "Resolving tile coverage"
        );

        let bbox = BoundingBox::new(input.west, input.south, input.east, input.north)
            .map_err(Error::from)?;
        let max_tiles = input.max_tiles.unwrap_or(DEFAULT_MAX_COVERAGE_TILES);

        match resolve_coverage_capped(bbox, input.zoom, max_tiles) {
            Ok(tiles) => Ok(TileCoverageOutput {
                success: true,
                zoom: input.zoom,
                tile_count: tiles.len(),
                tiles: tiles
                    .into_iter()
                    .map(|t| TileCoordinates {
                        x: t.x,
                        y: t.y,
                        z: t.z,
                    })
                    .collect(),
                error: None,
            }),
            Err(geoatlas_lib::Error::CoverageTooLarge { requested, max }) => {
                Ok(TileCoverageOutput {
                    success: false,
                    zoom: input.zoom,
                    tile_count: 0,
                    tiles: vec![],
                    error: Some(ToolError {
                        code: "COVERAGE_TOO_LARGE".to_string(),
                        message: format!(
                            "Coverage of {requested} tiles exceeds the maximum of {max}"
                        ),
                        suggestions: vec![
                            "Lower the zoom level".to_string(),
                            "Shrink the bounding box".to_string(),
                        ],
                    }),
                })
            }
            Err(other) => Err(other.into()),
        }
    }
}

/// Place categories tool handler
///
/// Queries the cached category vocabulary with optional exact level and
/// parent filters. The first call loads the vocabulary; `refresh` forces
/// a re-fetch that replaces the cache wholesale.
pub struct ListCategoriesTool;

impl ListCategoriesTool {
    /// Handle a category listing request
    pub async fn execute(
        state: &ServerState,
        input: ListCategoriesInput,
    ) -> crate::Result<ListCategoriesOutput> {
        let categories = Arc::clone(&state.categories);
        let source = Arc::clone(&state.category_source);
        let refresh = input.refresh;
        tokio::task::spawn_blocking(move || {
            if refresh {
                categories.refresh(source.as_ref());
            } else {
                categories.ensure_loaded(source.as_ref());
            }
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?;

        let results = state
            .categories
            .query(input.level, input.parent_category_id.as_deref());

        debug!(
            count = results.len(),
            level = ?input.level,
            parent = ?input.parent_category_id,
            "Listed place categories"
        );

        Ok(ListCategoriesOutput {
            count: results.len(),
            degraded: state.categories.is_degraded(),
            categories: results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoatlas_lib::{CategoryEntry, CategorySource, Geocoder, ResolvedLocation};

    struct StubGeocoder {
        result: geoatlas_lib::Result<Option<ResolvedLocation>>,
    }

    impl StubGeocoder {
        fn country(address: &str, latitude: f64, longitude: f64) -> Self {
            Self {
                result: Ok(Some(ResolvedLocation {
                    formatted_address: address.to_string(),
                    point: GeoPoint::new(latitude, longitude).unwrap(),
                    location_type: "Country".to_string(),
                    score: 100.0,
                })),
            }
        }

        fn empty() -> Self {
            Self { result: Ok(None) }
        }

        fn failing() -> Self {
            Self {
                result: Err(geoatlas_lib::Error::UpstreamUnavailable {
                    message: "simulated outage".to_string(),
                }),
            }
        }
    }

    impl Geocoder for StubGeocoder {
        fn geocode(&self, _query: &str) -> geoatlas_lib::Result<Option<ResolvedLocation>> {
            match &self.result {
                Ok(resolved) => Ok(resolved.clone()),
                Err(geoatlas_lib::Error::UpstreamUnavailable { message }) => {
                    Err(geoatlas_lib::Error::UpstreamUnavailable {
                        message: message.clone(),
                    })
                }
                Err(_) => unreachable!("stub only carries upstream errors"),
            }
        }
    }

    struct StubCategories {
        entries: Vec<CategoryEntry>,
    }

    impl CategorySource for StubCategories {
        fn fetch_categories(&self) -> geoatlas_lib::Result<Vec<CategoryEntry>> {
            Ok(self.entries.clone())
        }
    }

    fn state_with(geocoder: StubGeocoder) -> ServerState {
        ServerState::with_collaborators(
            Arc::new(geocoder),
            Arc::new(StubCategories {
                entries: vec![
                    CategoryEntry {
                        category_id: "13000".to_string(),
                        label: "Dining and Drinking".to_string(),
                        level: 1,
                        parent_category_id: None,
                    },
                    CategoryEntry {
                        category_id: "13065".to_string(),
                        label: "Restaurant".to_string(),
                        level: 2,
                        parent_category_id: Some("13000".to_string()),
                    },
                ],
            }),
        )
    }

    fn render_input(location: &str) -> RenderMapInput {
        RenderMapInput {
            location: Some(location.to_string()),
            latitude: None,
            longitude: None,
            zoom: None,
            style: None,
        }
    }

    #[tokio::test]
    async fn country_query_uses_overview_defaults() {
        let state = state_with(StubGeocoder::country("Germany", 51.1657, 10.4515));
        let output = RenderMapTool::execute(&state, render_input("Germany"))
            .await
            .unwrap();

        assert!(output.success);
        let map = output.map.expect("rendered map");
        assert_eq!(map.zoom, 4);
        assert_eq!(map.style, "world");
        assert_eq!(map.granularity.as_deref(), Some("country"));
        assert_eq!(map.tile_coordinates, TileCoordinates { x: 8, y: 5, z: 4 });
        assert!(map.tile_url.contains("/world/static/tile/4/5/8"));
        assert_eq!(map.alternate_provider_urls.len(), 3);
    }

    #[tokio::test]
    async fn explicit_zoom_and_style_override_defaults() {
        let state = state_with(StubGeocoder::country("Germany", 51.1657, 10.4515));
        let mut input = render_input("Germany");
        input.zoom = Some(10);
        input.style = Some("imagery".to_string());

        let output = RenderMapTool::execute(&state, input).await.unwrap();
        let map = output.map.expect("rendered map");
        assert_eq!(map.zoom, 10);
        assert_eq!(map.style, "imagery");
    }

    #[tokio::test]
    async fn coordinates_without_geocoding_render_at_city_defaults() {
        let state = state_with(StubGeocoder::empty());
        let input = RenderMapInput {
            location: None,
            latitude: Some(48.2082),
            longitude: Some(16.3738),
            zoom: None,
            style: None,
        };

        let output = RenderMapTool::execute(&state, input).await.unwrap();
        let map = output.map.expect("rendered map");
        assert_eq!(map.zoom, 11);
        assert_eq!(map.style, "navigation");
        assert!(map.granularity.is_none());
        assert!(map.matched_address.is_none());
    }

    #[tokio::test]
    async fn unresolvable_location_degrades_with_summary() {
        let state = state_with(StubGeocoder::empty());
        let output = RenderMapTool::execute(&state, render_input("Atlantis"))
            .await
            .unwrap();

        assert!(!output.success);
        assert!(output.map.is_none());
        assert!(output.summary.contains("Atlantis"));
        let error = output.error.expect("degraded error");
        assert_eq!(error.code, "LOCATION_NOT_FOUND");
    }

    #[tokio::test]
    async fn geocoder_outage_degrades_instead_of_erroring() {
        let state = state_with(StubGeocoder::failing());
        let output = RenderMapTool::execute(&state, render_input("Berlin"))
            .await
            .unwrap();

        assert!(!output.success);
        assert!(output.summary.contains("Berlin"));
    }

    #[tokio::test]
    async fn unknown_style_is_rejected_with_400() {
        let state = state_with(StubGeocoder::country("Germany", 51.1657, 10.4515));
        let mut input = render_input("Germany");
        input.style = Some("no-such-style".to_string());

        let err = RenderMapTool::execute(&state, input).await.unwrap_err();
        assert_eq!(err.code, 400);
    }

    #[tokio::test]
    async fn missing_location_and_coordinates_is_rejected() {
        let state = state_with(StubGeocoder::empty());
        let input = RenderMapInput {
            location: None,
            latitude: None,
            longitude: None,
            zoom: None,
            style: None,
        };

        let err = RenderMapTool::execute(&state, input).await.unwrap_err();
        assert_eq!(err.code, 400);
    }

    #[tokio::test]
    async fn tile_coverage_resolves_antimeridian_boxes() {
        let input = TileCoverageInput {
            west: 170.0,
            south: -10.0,
            east: -170.0,
            north: 10.0,
            zoom: 4,
            max_tiles: None,
        };

        let output = TileCoverageTool::execute(input).await.unwrap();
        assert!(output.success);
        assert_eq!(output.tile_count, 4);
        assert_eq!(output.tiles[0], TileCoordinates { x: 0, y: 7, z: 4 });
        assert_eq!(output.tiles[1], TileCoordinates { x: 15, y: 7, z: 4 });
    }

    #[tokio::test]
    async fn oversized_coverage_reports_counts() {
        let input = TileCoverageInput {
            west: -170.0,
            south: -60.0,
            east: 170.0,
            north: 60.0,
            zoom: 8,
            max_tiles: None,
        };

        let output = TileCoverageTool::execute(input).await.unwrap();
        assert!(!output.success);
        assert!(output.tiles.is_empty());
        let error = output.error.expect("cap error");
        assert_eq!(error.code, "COVERAGE_TOO_LARGE");
        assert!(error.message.contains("100"));
    }

    #[tokio::test]
    async fn inverted_bounding_box_is_rejected() {
        let input = TileCoverageInput {
            west: 0.0,
            south: 20.0,
            east: 10.0,
            north: 10.0,
            zoom: 4,
            max_tiles: None,
        };

        let err = TileCoverageTool::execute(input).await.unwrap_err();
        assert_eq!(err.code, 400);
    }

    #[tokio::test]
    async fn list_categories_filters_by_level_and_parent() {
        let state = state_with(StubGeocoder::empty());

        let output = ListCategoriesTool::execute(
            &state,
            ListCategoriesInput {
                level: Some(2),
                parent_category_id: Some("13000".to_string()),
                refresh: false,
            },
        )
        .await
        .unwrap();

        assert_eq!(output.count, 1);
        assert!(!output.degraded);
        assert_eq!(output.categories[0].label, "Restaurant");
    }
}
