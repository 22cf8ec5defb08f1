//! Two-attempt reference-point acquisition.
//!
//! The first attempt asks for a high-accuracy fix. A denied, unavailable, or
//! timed-out attempt triggers one more with relaxed accuracy and a longer
//! acceptable cache age. A reading outside valid bounds fails acquisition
//! outright, as does a missing location capability. When acquisition fails
//! the caller substitutes a default reference point via [`resolve_or_default`].

use std::time::Duration;

use pasaley_core::{Coordinate, ReferencePoint, ReferenceSource};

use crate::error::LocationError;
use crate::provider::{Accuracy, LocationProvider, PositionOptions};

/// Options for the high-accuracy attempt and its low-accuracy fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquisitionPolicy {
    pub primary: PositionOptions,
    pub fallback: PositionOptions,
}

impl Default for AcquisitionPolicy {
    fn default() -> Self {
        Self {
            primary: PositionOptions {
                accuracy: Accuracy::High,
                timeout: Duration::from_secs(15),
                maximum_age: Duration::from_secs(5 * 60),
            },
            fallback: PositionOptions {
                accuracy: Accuracy::Low,
                timeout: Duration::from_secs(10),
                maximum_age: Duration::from_secs(10 * 60),
            },
        }
    }
}

impl AcquisitionPolicy {
    #[must_use]
    pub fn from_app_config(config: &pasaley_core::AppConfig) -> Self {
        Self {
            primary: PositionOptions {
                accuracy: Accuracy::High,
                timeout: config.locate_timeout(),
                maximum_age: config.locate_max_age(),
            },
            fallback: PositionOptions {
                accuracy: Accuracy::Low,
                timeout: config.locate_fallback_timeout(),
                maximum_age: config.locate_fallback_max_age(),
            },
        }
    }

    fn options_for(&self, accuracy: Accuracy) -> &PositionOptions {
        match accuracy {
            Accuracy::High => &self.primary,
            Accuracy::Low => &self.fallback,
        }
    }
}

/// A reading that passed bounds validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinate: Coordinate,
    /// Accuracy radius in metres as reported by the provider.
    pub accuracy_m: Option<f64>,
}

impl From<Coordinate> for Position {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            accuracy_m: None,
        }
    }
}

/// A validated position and the attempt that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub coordinate: Coordinate,
    pub accuracy: Accuracy,
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionState {
    Idle,
    Acquiring(Accuracy),
    Resolved(Fix),
    Failed(LocationError),
}

impl AcquisitionState {
    /// `Idle` moves to the high-accuracy attempt; every other state is unchanged.
    #[must_use]
    pub fn begin(self) -> Self {
        match self {
            AcquisitionState::Idle => AcquisitionState::Acquiring(Accuracy::High),
            other => other,
        }
    }

    /// Apply the outcome of the attempt in flight.
    ///
    /// Outcomes delivered to a non-acquiring state are ignored.
    #[must_use]
    pub fn advance(self, outcome: Result<Position, LocationError>) -> Self {
        match (self, outcome) {
            (AcquisitionState::Acquiring(accuracy), Ok(position)) => {
                AcquisitionState::Resolved(Fix {
                    coordinate: position.coordinate,
                    accuracy,
                    accuracy_m: position.accuracy_m,
                })
            }
            (
                AcquisitionState::Acquiring(Accuracy::High),
                Err(err @ (LocationError::Unsupported | LocationError::InvalidCoordinate { .. })),
            ) => AcquisitionState::Failed(err),
            (AcquisitionState::Acquiring(Accuracy::High), Err(_)) => {
                AcquisitionState::Acquiring(Accuracy::Low)
            }
            (AcquisitionState::Acquiring(Accuracy::Low), Err(err)) => {
                AcquisitionState::Failed(err)
            }
            (state, _) => state,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AcquisitionState::Resolved(_) | AcquisitionState::Failed(_)
        )
    }
}

/// Acquire a validated position, falling back to low accuracy once.
///
/// # Errors
///
/// Returns the failure of the last attempt: [`LocationError::Denied`],
/// [`LocationError::Unavailable`], or [`LocationError::Timeout`]. Returns
/// [`LocationError::InvalidCoordinate`] or [`LocationError::Unsupported`]
/// without a second attempt.
pub async fn acquire<P: LocationProvider>(
    provider: &P,
    policy: &AcquisitionPolicy,
) -> Result<Fix, LocationError> {
    let mut state = AcquisitionState::Idle;

    loop {
        let accuracy = match state {
            AcquisitionState::Idle => {
                state = state.begin();
                continue;
            }
            AcquisitionState::Acquiring(accuracy) => accuracy,
            AcquisitionState::Resolved(fix) => {
                tracing::info!(
                    lat = fix.coordinate.lat(),
                    lng = fix.coordinate.lng(),
                    accuracy = fix.accuracy.as_str(),
                    accuracy_m = fix.accuracy_m,
                    "location resolved"
                );
                return Ok(fix);
            }
            AcquisitionState::Failed(err) => {
                tracing::warn!(reason = err.reason(), error = %err, "location acquisition failed");
                return Err(err);
            }
        };

        let outcome = attempt(provider, policy.options_for(accuracy)).await;
        if let Err(err) = &outcome {
            tracing::debug!(
                accuracy = accuracy.as_str(),
                reason = err.reason(),
                "location attempt failed"
            );
        }
        state = state.advance(outcome);
    }
}

async fn attempt<P: LocationProvider>(
    provider: &P,
    options: &PositionOptions,
) -> Result<Position, LocationError> {
    let reading = tokio::time::timeout(options.timeout, provider.request(options))
        .await
        .map_err(|_| LocationError::Timeout)??;

    let coordinate =
        Coordinate::new(reading.lat, reading.lng).map_err(|_| LocationError::InvalidCoordinate {
            lat: reading.lat,
            lng: reading.lng,
        })?;

    Ok(Position {
        coordinate,
        accuracy_m: reading.accuracy_m,
    })
}

/// The outcome of acquisition with the default already substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub reference: ReferencePoint,
    /// Why the default was used, when it was.
    pub failure: Option<LocationError>,
}

/// Acquire a position, or substitute `default` so ranking stays usable.
pub async fn resolve_or_default<P: LocationProvider>(
    provider: &P,
    policy: &AcquisitionPolicy,
    default: Coordinate,
) -> Resolution {
    match acquire(provider, policy).await {
        Ok(fix) => Resolution {
            reference: ReferencePoint {
                coordinate: fix.coordinate,
                source: ReferenceSource::Located,
            },
            failure: None,
        },
        Err(err) => {
            tracing::info!(reason = err.reason(), default = %default, "using default reference point");
            Resolution {
                reference: ReferencePoint {
                    coordinate: default,
                    source: ReferenceSource::Default,
                },
                failure: Some(err),
            }
        }
    }
}
