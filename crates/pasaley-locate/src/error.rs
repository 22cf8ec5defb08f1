use thiserror::Error;

/// Why a location reading could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    /// The user or platform refused access to the location capability.
    #[error("location access denied")]
    Denied,

    /// The capability is present but could not determine a position.
    #[error("location unavailable: {0}")]
    Unavailable(String),

    /// No reading arrived within the attempt's time budget.
    #[error("location request timed out")]
    Timeout,

    /// No location capability is configured at all.
    #[error("location capability is not supported")]
    Unsupported,

    /// A reading arrived but its latitude/longitude are out of range.
    #[error("invalid coordinate received: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

impl LocationError {
    /// Short machine-readable reason, used in logs and API metadata.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            LocationError::Denied => "denied",
            LocationError::Unavailable(_) => "unavailable",
            LocationError::Timeout => "timeout",
            LocationError::Unsupported => "unsupported",
            LocationError::InvalidCoordinate { .. } => "invalid_coordinate",
        }
    }

    /// Message suitable for showing to a person, with a hint on what to do next.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Denied => {
                "Location access denied. Please enable location permissions in your settings."
            }
            LocationError::Unavailable(_) => {
                "Location information unavailable. Please check your location settings."
            }
            LocationError::Timeout => "Location request timed out. Please try again.",
            LocationError::Unsupported => "Location is not supported on this device.",
            LocationError::InvalidCoordinate { .. } => {
                "Unable to get your location. Please enable location access or try again."
            }
        }
    }
}

/// Errors building a provider, before any location is requested.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid location service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
