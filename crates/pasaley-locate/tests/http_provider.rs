//! Integration tests for `HttpProvider` using wiremock HTTP mocks.

use std::time::Duration;

use pasaley_core::ReferenceSource;
use pasaley_locate::{
    resolve_or_default, Accuracy, AcquisitionPolicy, HttpProvider, LocationError,
    LocationProvider, PositionOptions,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(accuracy: Accuracy) -> PositionOptions {
    PositionOptions {
        accuracy,
        timeout: Duration::from_secs(2),
        maximum_age: Duration::from_secs(300),
    }
}

fn provider(server: &MockServer) -> HttpProvider {
    HttpProvider::new(&format!("{}/json", server.uri())).expect("provider construction")
}

#[tokio::test]
async fn parses_lat_lon_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .and(query_param("accuracy", "high"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 27.7172,
            "lon": 85.324,
            "accuracy": 25.0
        })))
        .mount(&server)
        .await;

    let reading = provider(&server)
        .request(&options(Accuracy::High))
        .await
        .expect("reading");

    assert!((reading.lat - 27.7172).abs() < f64::EPSILON);
    assert!((reading.lng - 85.324).abs() < f64::EPSILON);
    assert_eq!(reading.accuracy_m, Some(25.0));
}

#[tokio::test]
async fn accepts_latitude_longitude_aliases() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 27.73,
            "longitude": 85.315
        })))
        .mount(&server)
        .await;

    let reading = provider(&server)
        .request(&options(Accuracy::Low))
        .await
        .expect("reading");
    assert!((reading.lat - 27.73).abs() < f64::EPSILON);
    assert!((reading.lng - 85.315).abs() < f64::EPSILON);
    assert_eq!(reading.accuracy_m, None);
}

#[tokio::test]
async fn forbidden_maps_to_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = provider(&server)
        .request(&options(Accuracy::High))
        .await
        .unwrap_err();
    assert_eq!(err, LocationError::Denied);
}

#[tokio::test]
async fn server_error_maps_to_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider(&server)
        .request(&options(Accuracy::High))
        .await
        .unwrap_err();
    assert!(matches!(err, LocationError::Unavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn fail_status_maps_to_unavailable_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range"
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .request(&options(Accuracy::High))
        .await
        .unwrap_err();
    assert_eq!(err, LocationError::Unavailable("private range".to_owned()));
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 27.7, "lon": 85.3 }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let opts = PositionOptions {
        accuracy: Accuracy::High,
        timeout: Duration::from_millis(50),
        maximum_age: Duration::from_secs(300),
    };
    let err = provider(&server).request(&opts).await.unwrap_err();
    assert_eq!(err, LocationError::Timeout);
}

#[tokio::test]
async fn fresh_reading_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 27.7, "lon": 85.3 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    let first = provider.request(&options(Accuracy::High)).await.unwrap();
    let second = provider.request(&options(Accuracy::High)).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn out_of_range_reading_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 91.0, "lon": 85.3 })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider(&server);
    provider.request(&options(Accuracy::High)).await.unwrap();
    provider.request(&options(Accuracy::High)).await.unwrap();
}

#[tokio::test]
async fn denied_service_falls_back_to_default_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(2)
        .mount(&server)
        .await;

    let resolution = resolve_or_default(
        &provider(&server),
        &AcquisitionPolicy::default(),
        pasaley_core::DEFAULT_REFERENCE,
    )
    .await;

    assert_eq!(resolution.reference.source, ReferenceSource::Default);
    assert_eq!(
        resolution.reference.coordinate,
        pasaley_core::DEFAULT_REFERENCE
    );
    assert_eq!(resolution.failure, Some(LocationError::Denied));
}

#[tokio::test]
async fn high_failure_then_low_success_resolves() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("accuracy", "high"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("accuracy", "low"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 27.72, "lon": 85.328 })),
        )
        .mount(&server)
        .await;

    let resolution = resolve_or_default(
        &provider(&server),
        &AcquisitionPolicy::default(),
        pasaley_core::DEFAULT_REFERENCE,
    )
    .await;

    assert_eq!(resolution.reference.source, ReferenceSource::Located);
    assert!((resolution.reference.coordinate.lat() - 27.72).abs() < f64::EPSILON);
    assert!(resolution.failure.is_none());
}

#[tokio::test]
async fn out_of_range_high_accuracy_reading_skips_low_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("accuracy", "high"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 91.0, "lon": 0.0 })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("accuracy", "low"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "lat": 27.72, "lon": 85.328 })),
        )
        .expect(0)
        .mount(&server)
        .await;

    let resolution = resolve_or_default(
        &provider(&server),
        &AcquisitionPolicy::default(),
        pasaley_core::DEFAULT_REFERENCE,
    )
    .await;

    assert_eq!(resolution.reference.source, ReferenceSource::Default);
    assert_eq!(
        resolution.failure,
        Some(LocationError::InvalidCoordinate { lat: 91.0, lng: 0.0 })
    );
}
