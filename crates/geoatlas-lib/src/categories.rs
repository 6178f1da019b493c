//! Place-category vocabulary cache.
//!
//! The category vocabulary is a hierarchical forest of (id, label, level,
//! parent) entries fetched once from an external service and then queried
//! many times to validate place-search filters. The cache holds an
//! immutable snapshot behind an atomic reference: loads and refreshes build
//! a complete replacement snapshot and swap it in whole, so concurrent
//! readers never observe a partially-populated vocabulary.
//!
//! Load failures degrade rather than propagate — category filtering is an
//! optional refinement, and an empty vocabulary with a degraded flag is
//! more useful to callers than an error aborting their whole request.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Default categories endpoint of the places service.
const DEFAULT_CATEGORIES_ENDPOINT: &str =
    "https://places-api.arcgis.com/arcgis/rest/services/places-service/v1/categories";

/// Timeout for the vocabulary fetch. A hung load must not stall the caller;
/// timing out is treated as an ordinary load failure.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// One entry of the category vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category_id: String,
    pub label: String,
    /// Depth in the hierarchy, starting at 1 for roots.
    pub level: u32,
    /// Absent for roots.
    pub parent_category_id: Option<String>,
}

/// External collaborator supplying the full flat vocabulary.
pub trait CategorySource {
    fn fetch_categories(&self) -> Result<Vec<CategoryEntry>>;
}

/// HTTP-backed category source for the places service.
pub struct HttpCategorySource {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpCategorySource {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_endpoint(DEFAULT_CATEGORIES_ENDPOINT.to_string(), api_key)
    }

    pub fn with_endpoint(endpoint: String, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

impl CategorySource for HttpCategorySource {
    fn fetch_categories(&self) -> Result<Vec<CategoryEntry>> {
        let mut query: Vec<(&str, &str)> = vec![("f", "json")];
        if let Some(key) = &self.api_key {
            query.push(("token", key));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::UpstreamUnavailable {
                message: format!("category fetch failed: {e}"),
            })?;

        let body: serde_json::Value = response.json().map_err(|e| Error::UpstreamUnavailable {
            message: format!("category response was not valid JSON: {e}"),
        })?;

        let raw = body
            .get("categories")
            .and_then(|v| v.as_array())
            .ok_or_else(|| Error::UpstreamUnavailable {
                message: "no categories found in service response".to_string(),
            })?;

        let entries = raw.iter().filter_map(parse_entry).collect::<Vec<_>>();
        debug!(entry_count = entries.len(), "fetched category vocabulary");
        Ok(entries)
    }
}

/// Flatten one raw service record. The service encodes depth as the length
/// of the `fullLabel` path and parents as an id array; entries missing an id
/// are skipped.
fn parse_entry(value: &serde_json::Value) -> Option<CategoryEntry> {
    let category_id = value.get("categoryId")?.as_str()?.to_string();
    let full_label: Vec<&str> = value
        .get("fullLabel")
        .and_then(|v| v.as_array())
        .map(|parts| parts.iter().filter_map(|p| p.as_str()).collect())
        .unwrap_or_default();
    let label = full_label.last().copied().unwrap_or(category_id.as_str());
    let level = full_label.len().max(1) as u32;
    let parent_category_id = value
        .get("parents")
        .and_then(|v| v.as_array())
        .and_then(|parents| parents.first())
        .and_then(|p| p.as_str())
        .map(str::to_string);

    Some(CategoryEntry {
        label: label.to_string(),
        category_id,
        level,
        parent_category_id,
    })
}

#[derive(Debug, Default)]
struct Snapshot {
    entries: Vec<CategoryEntry>,
    load_attempted: bool,
    degraded: bool,
}

/// Process-wide, read-mostly cache of the category vocabulary.
///
/// Construct once, inject into callers. All mutation replaces the backing
/// snapshot atomically; reads clone the current `Arc` and filter without
/// holding any lock.
#[derive(Debug, Default)]
pub struct CategoryCache {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl CategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the vocabulary if no load has been attempted yet.
    ///
    /// Idempotent: after the first attempt — successful or not — further
    /// calls are no-ops until [`refresh`](Self::refresh) is requested. A
    /// failed load leaves the cache empty and degraded instead of raising.
    pub fn ensure_loaded(&self, source: &dyn CategorySource) {
        if self.current().load_attempted {
            return;
        }
        self.load_from(source);
    }

    /// Re-fetch the vocabulary and replace the snapshot wholesale.
    ///
    /// On failure the previous snapshot is kept so readers continue to see
    /// the last good vocabulary.
    pub fn refresh(&self, source: &dyn CategorySource) {
        match source.fetch_categories() {
            Ok(entries) => {
                info!(entry_count = entries.len(), "refreshed category cache");
                self.replace(Snapshot {
                    entries,
                    load_attempted: true,
                    degraded: false,
                });
            }
            Err(error) => {
                warn!(%error, "category refresh failed; keeping previous vocabulary");
            }
        }
    }

    /// Filter the cached vocabulary by exact level and/or parent id.
    ///
    /// No filters returns the full vocabulary. Ordering is the insertion
    /// order of the most recent load. Empty when unloaded or degraded.
    pub fn query(&self, level: Option<u32>, parent_category_id: Option<&str>) -> Vec<CategoryEntry> {
        let snapshot = self.current();
        snapshot
            .entries
            .iter()
            .filter(|entry| level.is_none_or(|wanted| entry.level == wanted))
            .filter(|entry| {
                parent_category_id.is_none_or(|wanted| {
                    entry.parent_category_id.as_deref() == Some(wanted)
                })
            })
            .cloned()
            .collect()
    }

    /// True when the most recent load attempt failed.
    pub fn is_degraded(&self) -> bool {
        self.current().degraded
    }

    /// Number of cached entries.
    pub fn entry_count(&self) -> usize {
        self.current().entries.len()
    }

    fn load_from(&self, source: &dyn CategorySource) {
        match source.fetch_categories() {
            Ok(entries) => {
                info!(entry_count = entries.len(), "loaded category cache");
                self.replace(Snapshot {
                    entries,
                    load_attempted: true,
                    degraded: false,
                });
            }
            Err(error) => {
                warn!(%error, "category load failed; cache degraded");
                self.replace(Snapshot {
                    entries: Vec::new(),
                    load_attempted: true,
                    degraded: true,
                });
            }
        }
    }

    fn current(&self) -> Arc<Snapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn replace(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}
