//! Reference-point acquisition for distance ranking.
//!
//! A [`LocationProvider`] produces raw readings. [`acquire`] runs the
//! high-accuracy attempt and its single low-accuracy fallback, validating
//! every reading; [`resolve_or_default`] substitutes a default point when
//! acquisition fails.

pub mod acquire;
pub mod configured;
pub mod error;
pub mod http;
pub mod provider;

pub use acquire::{
    acquire, resolve_or_default, AcquisitionPolicy, AcquisitionState, Fix, Position,
    Resolution,
};
pub use configured::ConfiguredProvider;
pub use error::{LocationError, ProviderBuildError};
pub use http::HttpProvider;
pub use provider::{
    Accuracy, FixedProvider, LocationProvider, PositionOptions, Reading, UnsupportedProvider,
};
