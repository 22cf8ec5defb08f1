use std::future::Future;
use std::time::Duration;

use crate::error::LocationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    High,
    Low,
}

impl Accuracy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Accuracy::High => "high",
            Accuracy::Low => "low",
        }
    }
}

/// Settings for a single location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub accuracy: Accuracy,
    /// Upper bound on how long the attempt may take.
    pub timeout: Duration,
    /// Oldest cached reading the provider may answer with.
    pub maximum_age: Duration,
}

/// A raw position as reported by a provider.
///
/// Values are not validated here; the acquisition layer rejects readings
/// outside valid bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub lat: f64,
    pub lng: f64,
    /// Reported accuracy radius in metres, when the provider knows it.
    pub accuracy_m: Option<f64>,
}

impl Reading {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            accuracy_m: None,
        }
    }
}

/// A source of position readings.
pub trait LocationProvider: Send + Sync {
    fn request(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Reading, LocationError>> + Send;
}

/// Answers every request with the same reading or the same failure.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    outcome: Result<Reading, LocationError>,
}

impl FixedProvider {
    #[must_use]
    pub fn new(reading: Reading) -> Self {
        Self {
            outcome: Ok(reading),
        }
    }

    #[must_use]
    pub fn failing(error: LocationError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl LocationProvider for FixedProvider {
    async fn request(&self, _options: &PositionOptions) -> Result<Reading, LocationError> {
        self.outcome.clone()
    }
}

/// Stand-in for an environment without any location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProvider;

impl LocationProvider for UnsupportedProvider {
    async fn request(&self, _options: &PositionOptions) -> Result<Reading, LocationError> {
        Err(LocationError::Unsupported)
    }
}
