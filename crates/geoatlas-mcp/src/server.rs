//! MCP server lifecycle and state management
//!
//! This module contains the main server state and initialization logic
//! for the MCP tool layer. It owns the external collaborators (geocoder,
//! category source), the category cache, and the artifact assembler shared
//! by all tool handlers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use geoatlas_lib::{
    ArtifactAssembler, ArcGisGeocoder, CategoryCache, CategorySource, Geocoder,
    HttpCategorySource, MapStyle, TileServiceConfig,
};

use crate::Error;

/// Environment variable carrying the API key for the geocoding and
/// category services. Anonymous access works for tile URLs.
const API_KEY_ENV: &str = "ARCGIS_API_KEY";

/// Main server state holding all runtime resources
///
/// Shared across all request handlers; every field is either immutable
/// after construction or internally synchronized, so handlers borrow it
/// without locking.
pub struct ServerState {
    /// Resolves free-text place queries to coordinates
    pub geocoder: Arc<dyn Geocoder + Send + Sync>,

    /// Supplies the place-category vocabulary
    pub category_source: Arc<dyn CategorySource + Send + Sync>,

    /// Cached category vocabulary, loaded lazily and shared by readers
    pub categories: Arc<CategoryCache>,

    /// Builds map artifact bundles against the configured tile service
    pub assembler: ArtifactAssembler,

    /// Server initialization timestamp for metadata
    pub initialized_at: chrono::DateTime<chrono::Utc>,
}

/// Metadata about the running service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Number of basemap styles in the catalogue
    pub style_count: usize,

    /// Number of cached place categories
    pub category_count: usize,

    /// Whether the last category load failed
    pub categories_degraded: bool,

    /// Timestamp when the server state was created
    pub initialized_at: String,
}

/// Descriptor for MCP resources exposed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub uri: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl ServerState {
    /// Create server state with the default HTTP-backed collaborators.
    ///
    /// Reads the API key from `ARCGIS_API_KEY` when set; the tile and
    /// provider URLs work without one.
    pub fn new() -> crate::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).ok();
        let geocoder =
            ArcGisGeocoder::new(api_key.clone()).map_err(|e| Error::internal(e.to_string()))?;
        let category_source =
            HttpCategorySource::new(api_key).map_err(|e| Error::internal(e.to_string()))?;

        Ok(Self::with_collaborators(
            Arc::new(geocoder),
            Arc::new(category_source),
        ))
    }

    /// Create server state with explicit collaborators. Tests inject stubs
    /// here.
    pub fn with_collaborators(
        geocoder: Arc<dyn Geocoder + Send + Sync>,
        category_source: Arc<dyn CategorySource + Send + Sync>,
    ) -> Self {
        Self {
            geocoder,
            category_source,
            categories: Arc::new(CategoryCache::new()),
            assembler: ArtifactAssembler::new(TileServiceConfig::default()),
            initialized_at: chrono::Utc::now(),
        }
    }

    /// Initialize the server and prepare for tool requests
    ///
    /// Warms the category cache so the first list_place_categories call
    /// does not pay the fetch latency. A failed warm-up degrades the cache
    /// but never fails startup.
    pub async fn initialize(&self) -> crate::Result<()> {
        let categories = Arc::clone(&self.categories);
        let source = Arc::clone(&self.category_source);
        tokio::task::spawn_blocking(move || categories.ensure_loaded(source.as_ref()))
            .await
            .map_err(|e| Error::internal(e.to_string()))?;

        if self.categories.is_degraded() {
            warn!("category vocabulary unavailable; category filtering is degraded");
        }

        info!(
            category_count = self.categories.entry_count(),
            style_count = MapStyle::ALL.len(),
            "MCP server initialized"
        );
        Ok(())
    }

    /// Get service metadata for the geoatlas://service/info resource
    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            style_count: MapStyle::ALL.len(),
            category_count: self.categories.entry_count(),
            categories_degraded: self.categories.is_degraded(),
            initialized_at: self.initialized_at.to_rfc3339(),
        }
    }

    /// List MCP resources exposed by this server
    pub fn resources(&self) -> Vec<ResourceDescriptor> {
        vec![
            ResourceDescriptor {
                uri: "geoatlas://styles",
                title: "Basemap Styles",
                description: "Supported basemap styles grouped by family",
            },
            ResourceDescriptor {
                uri: "geoatlas://zoom-levels",
                title: "Zoom Levels",
                description: "Zoom levels 0-22 with human-readable descriptions",
            },
            ResourceDescriptor {
                uri: "geoatlas://categories/status",
                title: "Category Cache Status",
                description: "Place-category vocabulary size and degradation state",
            },
        ]
    }
}
