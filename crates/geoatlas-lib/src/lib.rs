//! GeoAtlas library entry points.
//!
//! This crate exposes the static-map rendering pipeline: Web Mercator tile
//! math, bounding-box coverage resolution, granularity classification with
//! render defaults, basemap style vocabulary, map artifact assembly, and the
//! external collaborators (geocoder, place-category cache). Higher-level
//! consumers (CLI, MCP server) should only depend on the types exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod artifact;
pub mod categories;
pub mod coverage;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod granularity;
pub mod mercator;
pub mod style;

pub use artifact::{
    ArtifactAssembler, ArtifactOutcome, MapArtifactBundle, RenderSpec, TileServiceConfig,
};
pub use categories::{CategoryCache, CategoryEntry, CategorySource, HttpCategorySource};
pub use coverage::{resolve_coverage, resolve_coverage_capped, DEFAULT_MAX_COVERAGE_TILES};
pub use error::{Error, Result};
pub use geo::{BoundingBox, GeoPoint, TileIndex};
pub use geocode::{ArcGisGeocoder, Geocoder, ResolvedLocation};
pub use granularity::{
    classify, defaults_for, zoom_description, LocationGranularity, RenderDefaults,
};
pub use mercator::{point_to_tile, tile_to_bounds, MAX_MERCATOR_LATITUDE, MAX_ZOOM, MIN_ZOOM};
pub use style::{MapStyle, StyleCategory};
