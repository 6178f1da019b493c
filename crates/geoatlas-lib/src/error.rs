use thiserror::Error;

/// Convenient result alias for the geoatlas library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a zoom level falls outside the supported 0-22 range and
    /// the calling API rejects rather than clamps.
    #[error("invalid zoom level {zoom}; must be between 0 and 22")]
    InvalidZoom { zoom: i32 },

    /// Raised when a latitude falls outside [-90, 90].
    #[error("invalid latitude {latitude}; must be between -90 and 90")]
    InvalidLatitude { latitude: f64 },

    /// Raised when a longitude falls outside [-180, 180].
    #[error("invalid longitude {longitude}; must be between -180 and 180")]
    InvalidLongitude { longitude: f64 },

    /// Raised when a bounding box has its south edge above its north edge.
    #[error("invalid bounding box: south ({south}) exceeds north ({north})")]
    InvalidBoundingBox { south: f64, north: f64 },

    /// Raised when resolving a bounding box would produce more tiles than
    /// the configured cap allows. Lower the zoom or shrink the box.
    #[error("coverage of {requested} tiles exceeds the maximum of {max}; reduce the bounding box or zoom level")]
    CoverageTooLarge { requested: usize, max: usize },

    /// Raised when a basemap style name is not recognised.
    #[error("unsupported basemap style: {style}{}", format_suggestions(.suggestions))]
    UnsupportedStyle {
        style: String,
        suggestions: Vec<String>,
    },

    /// Raised when an external collaborator (geocoder, category service)
    /// fails or times out.
    #[error("upstream service unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
