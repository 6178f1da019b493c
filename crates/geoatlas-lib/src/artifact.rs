//! Map artifact assembly.
//!
//! Turns a resolved centre coordinate plus render parameters into the full
//! output bundle: the primary tile URL, alternate-provider links for human
//! navigation, an embeddable HTML fragment, and a one-paragraph summary.
//! Assembly never fails outright — when upstream resolution failed the
//! bundle degrades to text-only output instead of being omitted, so callers
//! always have something to show.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;
use tracing::debug;

use crate::geo::{GeoPoint, TileIndex};
use crate::granularity::zoom_description;
use crate::mercator::{point_to_tile, MAX_ZOOM};
use crate::style::MapStyle;

/// Tile service endpoint configuration.
///
/// The template carries `{style}`, `{z}`, `{y}` and `{x}` placeholders. Note
/// the z/y/x path ordering of the static basemap tile service.
#[derive(Debug, Clone)]
pub struct TileServiceConfig {
    pub template: String,
}

impl Default for TileServiceConfig {
    fn default() -> Self {
        Self {
            template: "https://static-map-tiles-api.arcgis.com/arcgis/rest/services/static-basemap-tiles-service/v1/arcgis/{style}/static/tile/{z}/{y}/{x}".to_string(),
        }
    }
}

/// Parameters for rendering one map artifact bundle.
///
/// `zoom` is a raw caller value and may lie outside [0, 22]; it is clamped
/// at assembly time rather than rejected, matching what downstream tile
/// services do. Explicit caller values always override classifier defaults.
#[derive(Debug, Clone)]
pub struct RenderSpec {
    pub center: GeoPoint,
    pub zoom: i32,
    pub style: MapStyle,
    /// Resolved location label (formatted address), when known.
    pub label: Option<String>,
    /// Geocoder confidence score out of 100, when supplied.
    pub score: Option<f64>,
}

impl RenderSpec {
    /// Build a spec from classifier defaults for a resolved centre.
    pub fn with_defaults(center: GeoPoint, defaults: crate::granularity::RenderDefaults) -> Self {
        Self {
            center,
            zoom: defaults.zoom as i32,
            style: defaults.style,
            label: None,
            score: None,
        }
    }

    /// The zoom level actually used for rendering, clamped to [0, 22].
    pub fn effective_zoom(&self) -> u8 {
        self.zoom.clamp(0, MAX_ZOOM as i32) as u8
    }
}

/// Assembled map artifacts for one location. Derived per request, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MapArtifactBundle {
    /// Tile containing the centre coordinate; absent when unresolved.
    pub tile: Option<TileIndex>,
    /// Primary tile service URL; absent when unresolved.
    pub tile_url: Option<String>,
    /// Provider name to navigation URL, in deterministic order.
    pub provider_urls: BTreeMap<String, String>,
    /// Embeddable HTML fragment; plain text when unresolved.
    pub embed_markup: String,
    /// One-paragraph human-readable summary.
    pub summary: String,
}

/// Tagged assembly outcome.
///
/// The degraded arm still carries a bundle — with absent URLs and an
/// explanatory summary — preserving the "never omit the output" contract
/// while giving callers exhaustive-match safety.
#[derive(Debug, Clone)]
pub enum ArtifactOutcome {
    Rendered(MapArtifactBundle),
    Degraded {
        reason: String,
        bundle: MapArtifactBundle,
    },
}

impl ArtifactOutcome {
    /// The bundle regardless of outcome.
    pub fn bundle(&self) -> &MapArtifactBundle {
        match self {
            ArtifactOutcome::Rendered(bundle) => bundle,
            ArtifactOutcome::Degraded { bundle, .. } => bundle,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, ArtifactOutcome::Rendered(_))
    }
}

/// Assembles artifact bundles against a configured tile service.
#[derive(Debug, Clone, Default)]
pub struct ArtifactAssembler {
    config: TileServiceConfig,
}

impl ArtifactAssembler {
    pub fn new(config: TileServiceConfig) -> Self {
        Self { config }
    }

    /// Build the full artifact bundle for a resolved location.
    pub fn assemble(&self, spec: &RenderSpec) -> MapArtifactBundle {
        let zoom = spec.effective_zoom();
        if spec.zoom != zoom as i32 {
            debug!(requested = spec.zoom, clamped = zoom, "clamped render zoom");
        }

        let tile = point_to_tile(spec.center, zoom).expect("zoom clamped to valid range");
        let tile_url = self.tile_url(spec.style, tile);
        let provider_urls = provider_urls(spec.center, zoom);
        let embed_markup = embed_markup(spec.center, zoom, spec.label.as_deref(), &provider_urls);
        let summary = render_summary(spec, zoom);

        MapArtifactBundle {
            tile: Some(tile),
            tile_url: Some(tile_url),
            provider_urls,
            embed_markup,
            summary,
        }
    }

    /// Build the text-only bundle used when upstream resolution failed.
    ///
    /// No geometry fields are populated; the summary explains what went
    /// wrong so the caller still has a displayable artifact.
    pub fn assemble_unresolved(&self, query: &str, reason: &str) -> ArtifactOutcome {
        let summary = format!("Could not resolve '{query}' to a map location: {reason}");
        let bundle = MapArtifactBundle {
            tile: None,
            tile_url: None,
            provider_urls: BTreeMap::new(),
            embed_markup: summary.clone(),
            summary,
        };

        ArtifactOutcome::Degraded {
            reason: reason.to_string(),
            bundle,
        }
    }

    /// Expand the configured template for one tile.
    pub fn tile_url(&self, style: MapStyle, tile: TileIndex) -> String {
        self.config
            .template
            .replace("{style}", style.as_str())
            .replace("{z}", &tile.z.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{x}", &tile.x.to_string())
    }
}

/// Alternate-provider navigation links for a centre coordinate. These are
/// viewer URLs for humans, not raster endpoints.
fn provider_urls(center: GeoPoint, zoom: u8) -> BTreeMap<String, String> {
    let (lat, lon) = (center.latitude, center.longitude);
    let mut urls = BTreeMap::new();
    urls.insert(
        "arcgis".to_string(),
        format!("https://www.arcgis.com/apps/mapviewer/index.html?center={lon},{lat}&level={zoom}"),
    );
    urls.insert(
        "google_maps".to_string(),
        format!("https://www.google.com/maps?q={lat},{lon}&z={zoom}"),
    );
    urls.insert(
        "openstreetmap".to_string(),
        format!("https://www.openstreetmap.org/?mlat={lat}&mlon={lon}&zoom={zoom}"),
    );
    urls
}

fn embed_markup(
    center: GeoPoint,
    _zoom: u8,
    label: Option<&str>,
    providers: &BTreeMap<String, String>,
) -> String {
    let (lat, lon) = (center.latitude, center.longitude);
    let caption = label.unwrap_or("Location");
    let bbox = format!(
        "{},{},{},{}",
        lon - 0.01,
        lat - 0.01,
        lon + 0.01,
        lat + 0.01
    );

    let mut markup = String::new();
    let _ = writeln!(
        markup,
        "<div class=\"geoatlas-map\">\n  <iframe width=\"100%\" height=\"300\" frameborder=\"0\" \
         src=\"https://www.openstreetmap.org/export/embed.html?bbox={bbox}&amp;layer=mapnik&amp;marker={lat},{lon}\" \
         title=\"Map showing {caption}\"></iframe>"
    );
    let _ = writeln!(markup, "  <p>{caption} ({lat:.4}, {lon:.4})</p>");
    let _ = writeln!(markup, "  <ul>");
    for (name, url) in providers {
        let _ = writeln!(markup, "    <li><a href=\"{url}\">View on {name}</a></li>");
    }
    let _ = writeln!(markup, "  </ul>\n</div>");
    markup
}

fn render_summary(spec: &RenderSpec, zoom: u8) -> String {
    let (lat, lon) = (spec.center.latitude, spec.center.longitude);
    let mut summary = String::new();

    if let Some(label) = &spec.label {
        let _ = write!(summary, "{label} at ");
    }
    let _ = write!(
        summary,
        "{lat:.4}, {lon:.4} — {} (zoom {zoom}, style {})",
        zoom_description(zoom),
        spec.style
    );
    if let Some(score) = spec.score {
        let _ = write!(summary, ". Accuracy score: {score}/100");
    }
    let _ = write!(summary, ".");

    summary
}
