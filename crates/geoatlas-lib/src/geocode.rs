//! Forward geocoding.
//!
//! A [`Geocoder`] resolves free-text place queries to coordinates plus the
//! metadata the rest of the pipeline needs: the formatted address for
//! labelling, the location-type tag for granularity classification, and the
//! match score for the summary. The trait keeps the external service at
//! arm's length so tools and tests can substitute stubs.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Default geocoding endpoint of the world geocoding service.
const DEFAULT_GEOCODE_ENDPOINT: &str =
    "https://geocode-api.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates";

/// Timeout for a single geocode request.
const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// A geocoded place: the best candidate for a free-text query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Formatted address of the match.
    pub formatted_address: String,
    pub point: GeoPoint,
    /// Raw location-type tag as reported by the geocoder, for example
    /// "PointAddress" or "Locality". Feed this to
    /// [`classify`](crate::granularity::classify).
    pub location_type: String,
    /// Match confidence out of 100.
    pub score: f64,
}

/// External collaborator resolving free-text queries to locations.
pub trait Geocoder {
    /// Resolve `query` to its best candidate, or `None` when the service
    /// returned no candidates at all.
    fn geocode(&self, query: &str) -> Result<Option<ResolvedLocation>>;
}

/// HTTP-backed geocoder for the world geocoding service.
pub struct ArcGisGeocoder {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl ArcGisGeocoder {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_endpoint(DEFAULT_GEOCODE_ENDPOINT.to_string(), api_key)
    }

    pub fn with_endpoint(endpoint: String, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(GEOCODE_TIMEOUT)
            .build()?;
        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

impl Geocoder for ArcGisGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<ResolvedLocation>> {
        let mut params: Vec<(&str, &str)> = vec![
            ("f", "json"),
            ("singleLine", query),
            ("outFields", "Addr_type,Type,Match_addr"),
            ("maxLocations", "1"),
        ];
        if let Some(key) = &self.api_key {
            params.push(("token", key));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::UpstreamUnavailable {
                message: format!("geocoding request failed: {e}"),
            })?;

        let body: serde_json::Value = response.json().map_err(|e| Error::UpstreamUnavailable {
            message: format!("geocoding response was not valid JSON: {e}"),
        })?;

        let candidate = match body
            .get("candidates")
            .and_then(|v| v.as_array())
            .and_then(|candidates| candidates.first())
        {
            Some(candidate) => candidate,
            None => {
                debug!(query, "geocoder returned no candidates");
                return Ok(None);
            }
        };

        let resolved = parse_candidate(candidate).ok_or_else(|| Error::UpstreamUnavailable {
            message: "geocoder candidate was missing location fields".to_string(),
        })?;

        debug!(
            query,
            address = %resolved.formatted_address,
            score = resolved.score,
            location_type = %resolved.location_type,
            "geocoded query"
        );
        Ok(Some(resolved))
    }
}

/// Extract the fields we need from one raw candidate. `Addr_type` is the
/// canonical tag; some result classes only populate `Type`.
fn parse_candidate(candidate: &serde_json::Value) -> Option<ResolvedLocation> {
    let location = candidate.get("location")?;
    let longitude = location.get("x")?.as_f64()?;
    let latitude = location.get("y")?.as_f64()?;
    let point = GeoPoint::new(latitude, longitude).ok()?;

    let formatted_address = candidate
        .get("address")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let score = candidate
        .get("score")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    let attributes = candidate.get("attributes");
    let location_type = attributes
        .and_then(|a| a.get("Addr_type"))
        .and_then(|v| v.as_str())
        .filter(|tag| !tag.is_empty())
        .or_else(|| {
            attributes
                .and_then(|a| a.get("Type"))
                .and_then(|v| v.as_str())
        })
        .unwrap_or_default()
        .to_string();

    Some(ResolvedLocation {
        formatted_address,
        point,
        location_type,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_candidate_reads_addr_type() {
        let raw = serde_json::json!({
            "address": "Berlin, Germany",
            "location": { "x": 13.4050, "y": 52.5200 },
            "score": 100.0,
            "attributes": { "Addr_type": "Locality", "Type": "City" }
        });
        let resolved = parse_candidate(&raw).expect("valid candidate");
        assert_eq!(resolved.formatted_address, "Berlin, Germany");
        assert_eq!(resolved.location_type, "Locality");
        assert_eq!(resolved.score, 100.0);
        assert!((resolved.point.latitude - 52.52).abs() < 1e-9);
    }

    #[test]
    fn parse_candidate_falls_back_to_type_tag() {
        let raw = serde_json::json!({
            "address": "Germany",
            "location": { "x": 10.4515, "y": 51.1657 },
            "score": 100.0,
            "attributes": { "Addr_type": "", "Type": "Country" }
        });
        let resolved = parse_candidate(&raw).expect("valid candidate");
        assert_eq!(resolved.location_type, "Country");
    }

    #[test]
    fn parse_candidate_rejects_missing_location() {
        let raw = serde_json::json!({ "address": "nowhere", "score": 50.0 });
        assert!(parse_candidate(&raw).is_none());
    }

    #[test]
    fn parse_candidate_rejects_out_of_range_coordinates() {
        let raw = serde_json::json!({
            "address": "bad",
            "location": { "x": 1234.0, "y": 91.0 },
            "score": 10.0
        });
        assert!(parse_candidate(&raw).is_none());
    }
}
