use pasaley_core::AppConfig;

use crate::error::{LocationError, ProviderBuildError};
use crate::http::HttpProvider;
use crate::provider::{LocationProvider, PositionOptions, Reading, UnsupportedProvider};

/// The provider selected by configuration.
///
/// With `PASALEY_LOCATE_URL` set this queries that service; without it there
/// is no location capability and acquisition reports `Unsupported`.
pub enum ConfiguredProvider {
    Http(HttpProvider),
    Unsupported(UnsupportedProvider),
}

impl ConfiguredProvider {
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] if the configured URL is invalid or the
    /// HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ProviderBuildError> {
        Self::from_url(config.locate_url.as_deref())
    }

    /// # Errors
    ///
    /// Same as [`ConfiguredProvider::from_app_config`].
    pub fn from_url(url: Option<&str>) -> Result<Self, ProviderBuildError> {
        match url {
            Some(url) => Ok(Self::Http(HttpProvider::new(url)?)),
            None => Ok(Self::Unsupported(UnsupportedProvider)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl LocationProvider for ConfiguredProvider {
    async fn request(&self, options: &PositionOptions) -> Result<Reading, LocationError> {
        match self {
            Self::Http(p) => p.request(options).await,
            Self::Unsupported(p) => p.request(options).await,
        }
    }
}
