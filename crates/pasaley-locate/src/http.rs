//! Location provider backed by an IP geolocation HTTP service.
//!
//! The service is queried with `GET <url>?accuracy=high|low` and is expected
//! to answer with a JSON object carrying `lat`/`lon` (aliases `latitude`,
//! `longitude`, `lng` are accepted). A `"status": "fail"` body counts as
//! unavailable. 401 and 403 responses mean access was refused.

use std::time::{Duration, Instant};

use pasaley_core::Coordinate;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{LocationError, ProviderBuildError};
use crate::provider::{Accuracy, LocationProvider, PositionOptions, Reading};

const DEFAULT_USER_AGENT: &str = "pasaley/0.1 (store-locator)";

#[derive(Debug, Deserialize)]
struct LookupBody {
    #[serde(default, alias = "latitude")]
    lat: Option<f64>,
    #[serde(default, alias = "longitude", alias = "lng")]
    lon: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    accuracy: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct CachedReading {
    reading: Reading,
    accuracy: Accuracy,
    at: Instant,
}

impl CachedReading {
    /// A high-accuracy request is only served by a high-accuracy reading.
    fn serves(&self, options: &PositionOptions, now: Instant) -> bool {
        let fresh = now.saturating_duration_since(self.at) <= options.maximum_age;
        let precise_enough = options.accuracy == Accuracy::Low || self.accuracy == Accuracy::High;
        fresh && precise_enough
    }
}

pub struct HttpProvider {
    client: Client,
    url: Url,
    cache: Mutex<Option<CachedReading>>,
}

impl HttpProvider {
    /// # Errors
    ///
    /// Returns [`ProviderBuildError::InvalidUrl`] if `url` does not parse, or
    /// [`ProviderBuildError::Http`] if the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, ProviderBuildError> {
        Self::with_user_agent(url, DEFAULT_USER_AGENT)
    }

    /// # Errors
    ///
    /// Same as [`HttpProvider::new`].
    pub fn with_user_agent(url: &str, user_agent: &str) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        let url = Url::parse(url).map_err(|e| ProviderBuildError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            url,
            cache: Mutex::new(None),
        })
    }

    fn build_url(&self, accuracy: Accuracy) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("accuracy", accuracy.as_str());
        url
    }

    async fn fetch(&self, options: &PositionOptions) -> Result<Reading, LocationError> {
        let url = self.build_url(options.accuracy);
        let response = self
            .client
            .get(url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(LocationError::Denied);
            }
            status if !status.is_success() => {
                return Err(LocationError::Unavailable(format!(
                    "location service returned HTTP {status}"
                )));
            }
            _ => {}
        }

        let body: LookupBody = response.json().await.map_err(map_transport_error)?;

        if body
            .status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("fail"))
        {
            let message = body.message.unwrap_or_else(|| "lookup failed".to_owned());
            return Err(LocationError::Unavailable(message));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lng)) => Ok(Reading {
                lat,
                lng,
                accuracy_m: body.accuracy,
            }),
            _ => Err(LocationError::Unavailable(
                "response is missing coordinates".to_owned(),
            )),
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> LocationError {
    if err.is_timeout() {
        LocationError::Timeout
    } else {
        LocationError::Unavailable(err.to_string())
    }
}

impl LocationProvider for HttpProvider {
    async fn request(&self, options: &PositionOptions) -> Result<Reading, LocationError> {
        if let Some(cached) = *self.cache.lock().await {
            if cached.serves(options, Instant::now()) {
                tracing::debug!(
                    accuracy = cached.accuracy.as_str(),
                    "serving cached location reading"
                );
                return Ok(cached.reading);
            }
        }

        let reading = self.fetch(options).await?;

        if Coordinate::new(reading.lat, reading.lng).is_ok() {
            *self.cache.lock().await = Some(CachedReading {
                reading,
                accuracy: options.accuracy,
                at: Instant::now(),
            });
        }

        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(accuracy: Accuracy, maximum_age: Duration) -> PositionOptions {
        PositionOptions {
            accuracy,
            timeout: Duration::from_secs(1),
            maximum_age,
        }
    }

    #[test]
    fn build_url_appends_accuracy() {
        let provider = HttpProvider::new("http://geo.local/json").unwrap();
        assert_eq!(
            provider.build_url(Accuracy::High).as_str(),
            "http://geo.local/json?accuracy=high"
        );
        assert_eq!(
            provider.build_url(Accuracy::Low).as_str(),
            "http://geo.local/json?accuracy=low"
        );
    }

    #[test]
    fn new_rejects_unparseable_url() {
        let err = HttpProvider::new("not a url").err().expect("should fail");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }

    #[test]
    fn cached_low_reading_does_not_serve_high_request() {
        let now = Instant::now();
        let cached = CachedReading {
            reading: Reading::new(27.7, 85.3),
            accuracy: Accuracy::Low,
            at: now,
        };
        let age = Duration::from_secs(60);
        assert!(cached.serves(&options(Accuracy::Low, age), now));
        assert!(!cached.serves(&options(Accuracy::High, age), now));
    }

    #[test]
    fn stale_cache_is_not_served() {
        let at = Instant::now();
        let cached = CachedReading {
            reading: Reading::new(27.7, 85.3),
            accuracy: Accuracy::High,
            at,
        };
        let later = at + Duration::from_secs(120);
        assert!(!cached.serves(&options(Accuracy::High, Duration::from_secs(60)), later));
        assert!(cached.serves(&options(Accuracy::High, Duration::from_secs(300)), later));
    }
}
