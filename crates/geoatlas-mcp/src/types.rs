//! Type definitions for MCP tool inputs and outputs
//!
//! This module defines all the serializable request and response types
//! for MCP tools, with JSON Schema generation for automatic validation.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use geoatlas_lib::CategoryEntry;

// ============================================================================
// TOOL INPUTS
// ============================================================================

/// Input for the render_map tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RenderMapInput {
    /// Free-text place name to geocode (e.g., "Berlin, Germany").
    /// Either this or latitude+longitude is required.
    pub location: Option<String>,

    /// Center latitude in decimal degrees (requires longitude)
    pub latitude: Option<f64>,

    /// Center longitude in decimal degrees (requires latitude)
    pub longitude: Option<f64>,

    /// Zoom level 0-22; out-of-range values are clamped.
    /// Defaults by location granularity when omitted.
    pub zoom: Option<i32>,

    /// Basemap style name (e.g., "navigation", "imagery", "world").
    /// Defaults by location granularity when omitted.
    pub style: Option<String>,
}

/// Input for the tile_coverage tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TileCoverageInput {
    /// Western edge longitude. May exceed `east` for boxes spanning the
    /// antimeridian.
    pub west: f64,

    /// Southern edge latitude
    pub south: f64,

    /// Eastern edge longitude
    pub east: f64,

    /// Northern edge latitude
    pub north: f64,

    /// Zoom level 0-22 (required)
    pub zoom: u8,

    /// Maximum number of tiles to allow (default: 100)
    pub max_tiles: Option<usize>,
}

/// Input for the list_place_categories tool
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCategoriesInput {
    /// Exact hierarchy level to filter by (1 = roots)
    pub level: Option<u32>,

    /// Parent category id to filter by
    pub parent_category_id: Option<String>,

    /// Force a re-fetch of the vocabulary before querying (default: false)
    #[serde(default)]
    pub refresh: bool,
}

// ============================================================================
// TOOL OUTPUTS
// ============================================================================

/// Output from the render_map tool
#[derive(Debug, Clone, Serialize)]
pub struct RenderMapOutput {
    /// Whether a map was fully rendered
    pub success: bool,

    /// Human-readable summary; always present, even on degraded output
    pub summary: String,

    /// Rendered map details (if resolved)
    pub map: Option<MapDetails>,

    /// Error details (if degraded)
    pub error: Option<ToolError>,
}

/// The fully-resolved rendering payload. All fields are populated together;
/// a half-rendered map is never emitted.
#[derive(Debug, Clone, Serialize)]
pub struct MapDetails {
    /// Center of the rendered map
    pub center: Coordinates,

    /// Zoom level actually rendered (after clamping and defaulting)
    pub zoom: u8,

    /// Human-readable description of the zoom level
    pub zoom_description: String,

    /// Basemap style rendered
    pub style: String,

    /// Location granularity the defaults were derived from, when the
    /// center came from geocoding
    pub granularity: Option<String>,

    /// Formatted address of the geocoded match, when available
    pub matched_address: Option<String>,

    /// Geocoder confidence score out of 100, when available
    pub score: Option<f64>,

    /// Tile containing the center coordinate
    pub tile_coordinates: TileCoordinates,

    /// Primary static tile URL
    pub tile_url: String,

    /// Alternate provider navigation URLs, keyed by provider name
    pub alternate_provider_urls: BTreeMap<String, String>,

    /// Embeddable HTML fragment
    pub embed_markup: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileCoordinates {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Output from the tile_coverage tool
#[derive(Debug, Clone, Serialize)]
pub struct TileCoverageOutput {
    /// Whether the coverage was resolved
    pub success: bool,

    /// Zoom level of the resolved tiles
    pub zoom: u8,

    /// Number of tiles in the coverage
    pub tile_count: usize,

    /// Covering tiles in row-major order (if resolved)
    pub tiles: Vec<TileCoordinates>,

    /// Error details (if rejected)
    pub error: Option<ToolError>,
}

/// Output from the list_place_categories tool
#[derive(Debug, Clone, Serialize)]
pub struct ListCategoriesOutput {
    /// Number of matching categories
    pub count: usize,

    /// True when the vocabulary could not be loaded and results are empty
    /// for that reason rather than because nothing matched
    pub degraded: bool,

    /// Matching categories in vocabulary order
    pub categories: Vec<CategoryEntry>,
}
