//! End-to-end tool tests against stubbed external collaborators.

use std::sync::Arc;

use geoatlas_lib::{CategoryEntry, CategorySource, GeoPoint, Geocoder, ResolvedLocation};
use geoatlas_mcp::types::{ListCategoriesInput, RenderMapInput};
use geoatlas_mcp::{ListCategoriesTool, RenderMapTool, ServerState};

struct FixtureGeocoder;

impl Geocoder for FixtureGeocoder {
    fn geocode(&self, query: &str) -> geoatlas_lib::Result<Option<ResolvedLocation>> {
        match query {
            "Germany" => Ok(Some(ResolvedLocation {
                formatted_address: "Germany".to_string(),
                point: GeoPoint::new(51.1657, 10.4515).unwrap(),
                location_type: "Country".to_string(),
                score: 100.0,
            })),
            "10 Downing Street, London" => Ok(Some(ResolvedLocation {
                formatted_address: "10 Downing Street, London, England".to_string(),
                point: GeoPoint::new(51.5034, -0.1276).unwrap(),
                location_type: "PointAddress".to_string(),
                score: 98.2,
            })),
            _ => Ok(None),
        }
    }
}

struct FixtureCategories;

impl CategorySource for FixtureCategories {
    fn fetch_categories(&self) -> geoatlas_lib::Result<Vec<CategoryEntry>> {
        Ok(vec![
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
        ])
    }
}

fn fixture_state() -> ServerState {
    ServerState::with_collaborators(Arc::new(FixtureGeocoder), Arc::new(FixtureCategories))
}

fn location_input(location: &str) -> RenderMapInput {
    RenderMapInput {
        location: Some(location.to_string()),
        latitude: None,
        longitude: None,
        zoom: None,
        style: None,
    }
}

#[tokio::test]
async fn country_query_renders_world_overview_tile() {
    let state = fixture_state();
    let output = RenderMapTool::execute(&state, location_input("Germany"))
        .await
        .unwrap();

    assert!(output.success);
    let map = output.map.expect("rendered map");
    assert_eq!(map.zoom, 4);
    assert_eq!(map.style, "world");
    assert_eq!(
        (
            map.tile_coordinates.x,
            map.tile_coordinates.y,
            map.tile_coordinates.z
        ),
        (8, 5, 4)
    );
    assert!(map.tile_url.contains("/world/static/tile/4/5/8"));
    assert_eq!(map.zoom_description, "Country view");
    assert!(output.summary.contains("Germany"));
    assert!(map.embed_markup.contains("iframe"));
}

#[tokio::test]
async fn street_address_renders_at_street_level() {
    let state = fixture_state();
    let output = RenderMapTool::execute(&state, location_input("10 Downing Street, London"))
        .await
        .unwrap();

    let map = output.map.expect("rendered map");
    assert_eq!(map.zoom, 16);
    assert_eq!(map.style, "navigation");
    assert_eq!(map.granularity.as_deref(), Some("address"));
    assert_eq!(map.score, Some(98.2));
}

#[tokio::test]
async fn unknown_place_produces_degraded_output_not_an_error() {
    let state = fixture_state();
    let output = RenderMapTool::execute(&state, location_input("Atlantis"))
        .await
        .unwrap();

    assert!(!output.success);
    assert!(output.map.is_none());
    assert!(output.summary.contains("Atlantis"));
}

#[tokio::test]
async fn categories_load_once_and_filter() {
    let state = fixture_state();

    let all = ListCategoriesTool::execute(
        &state,
        ListCategoriesInput {
            level: None,
            parent_category_id: None,
            refresh: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(all.count, 2);
    assert!(!all.degraded);

    let children = ListCategoriesTool::execute(
        &state,
        ListCategoriesInput {
            level: None,
            parent_category_id: Some("13000".to_string()),
            refresh: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(children.count, 1);
    assert_eq!(children.categories[0].label, "Restaurant");
}
