//! Error types and RFC 9457-style problem details for the MCP tool layer
//!
//! This module defines a unified error type for the MCP server that
//! can be serialized as RFC 9457 Problem Details for HTTP APIs or
//! MCP error responses.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, Error>;

/// MCP tool-layer error type implementing RFC 9457 Problem Details
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
#[error("{message}")]
pub struct Error {
    /// HTTP status-like code (e.g., 400, 404, 502)
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Machine-readable problem type URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// Additional error context (e.g., query, suggestions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl Error {
    /// Create a new error with a code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            r#type: None,
            context: None,
        }
    }

    /// Add a problem type URI
    pub fn with_type(mut self, type_uri: impl Into<String>) -> Self {
        self.r#type = Some(type_uri.into());
        self
    }

    /// Add context information as JSON
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Location could not be geocoded
    pub fn location_not_found(query: impl Into<String>) -> Self {
        let query = query.into();
        Self::new(404, format!("Location '{}' not found", query))
            .with_type("https://geoatlas.local/errors/location-not-found")
            .with_context(json!({
                "query": query,
                "message": "Try a more specific place name or supply coordinates directly"
            }))
    }

    /// Coverage request would exceed the tile cap
    pub fn coverage_too_large(requested: usize, max: usize) -> Self {
        Self::new(
            400,
            format!("Coverage of {} tiles exceeds the maximum of {}", requested, max),
        )
        .with_type("https://geoatlas.local/errors/coverage-too-large")
        .with_context(json!({
            "requested_tiles": requested,
            "max_tiles": max,
            "message": "Reduce the bounding box or lower the zoom level"
        }))
    }

    /// Invalid parameter error
    pub fn invalid_param(param: impl Into<String>, reason: impl Into<String>) -> Self {
        let p = param.into();
        Self::new(400, format!("Invalid parameter: {}", p))
            .with_type("https://geoatlas.local/errors/invalid-parameter")
            .with_context(json!({
                "parameter": p,
                "reason": reason.into()
            }))
    }

    /// Upstream service failure (geocoder, category service)
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::new(502, format!("Upstream service error: {}", reason.into()))
            .with_type("https://geoatlas.local/errors/upstream-unavailable")
    }

    /// Internal server error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(500, format!("Internal server error: {}", reason.into()))
            .with_type("https://geoatlas.local/errors/internal-error")
    }
}

impl From<geoatlas_lib::Error> for Error {
    fn from(err: geoatlas_lib::Error) -> Self {
        use geoatlas_lib::Error as Lib;
        match err {
            Lib::InvalidZoom { zoom } => {
                Self::invalid_param("zoom", format!("{} is outside the supported 0-22 range", zoom))
            }
            Lib::InvalidLatitude { latitude } => {
                Self::invalid_param("latitude", format!("{} is outside [-90, 90]", latitude))
            }
            Lib::InvalidLongitude { longitude } => {
                Self::invalid_param("longitude", format!("{} is outside [-180, 180]", longitude))
            }
            Lib::InvalidBoundingBox { south, north } => Self::invalid_param(
                "bounding_box",
                format!("south ({}) exceeds north ({})", south, north),
            ),
            Lib::CoverageTooLarge { requested, max } => Self::coverage_too_large(requested, max),
            Lib::UnsupportedStyle { style, suggestions } => {
                Self::invalid_param("style", format!("unsupported style '{}'", style))
                    .with_context(json!({
                        "parameter": "style",
                        "style": style,
                        "suggestions": suggestions
                    }))
            }
            Lib::UpstreamUnavailable { message } => Self::upstream(message),
            Lib::Http(e) => Self::upstream(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(400, "Bad request");
        assert_eq!(err.code, 400);
        assert_eq!(err.message, "Bad request");
    }

    #[test]
    fn test_location_not_found() {
        let err = Error::location_not_found("Atlantis");
        assert_eq!(err.code, 404);
        assert!(err.message.contains("Atlantis"));
        assert!(err.context.is_some());
    }

    #[test]
    fn test_coverage_too_large_carries_counts() {
        let err = Error::coverage_too_large(400, 100);
        assert_eq!(err.code, 400);
        let context = err.context.unwrap();
        assert_eq!(context["requested_tiles"], 400);
        assert_eq!(context["max_tiles"], 100);
    }

    #[test]
    fn test_lib_error_conversion() {
        let lib = geoatlas_lib::Error::InvalidZoom { zoom: 40 };
        let err: Error = lib.into();
        assert_eq!(err.code, 400);
        assert!(err.message.contains("zoom"));
    }

    #[test]
    fn test_error_serialization() {
        let err = Error::new(400, "test")
            .with_type("test/type")
            .with_context(json!({"key": "value"}));
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("400"));
        assert!(json.contains("test"));
    }
}
