mod products;
mod stores;


use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use pasaley_core::{format_km, round_km, Coordinate, ReferencePoint};
use pasaley_db::StoreRepository;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

pub struct AppState<R> {
    pub repo: Arc<R>,
    /// Reference point used when a request carries no `lat`/`lng`.
    pub default_reference: Coordinate,
    pub default_radius_km: f64,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            default_reference: self.default_reference,
            default_radius_km: self.default_radius_km,
        }
    }
}

impl<R: StoreRepository> AppState<R> {
    pub fn new(repo: R, config: &pasaley_core::AppConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            default_reference: config.default_reference,
            default_radius_km: config.default_radius_km,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    /// The point distances in `data` are measured from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferencePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
            reference: None,
            radius_km: None,
        }
    }

    pub(super) fn with_reference(mut self, reference: ReferencePoint) -> Self {
        self.reference = Some(reference);
        self
    }

    pub(super) fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = Some(radius_km);
        self
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub fn validation(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "validation_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &pasaley_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// Build the reference point from optional query coordinates.
///
/// Both or neither of `lat`/`lng` must be given; neither means the configured
/// default.
pub(super) fn reference_from_query(
    request_id: &str,
    lat: Option<f64>,
    lng: Option<f64>,
    default: Coordinate,
) -> Result<ReferencePoint, ApiError> {
    let supplied = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(
            Coordinate::new(lat, lng).map_err(|e| ApiError::validation(request_id, e.to_string()))?,
        ),
        (None, None) => None,
        _ => {
            return Err(ApiError::validation(
                request_id,
                "lat and lng must be supplied together",
            ))
        }
    };

    Ok(ReferencePoint::supplied_or(supplied, default))
}

pub(super) fn radius_from_query(
    request_id: &str,
    radius_km: Option<f64>,
    default: f64,
) -> Result<f64, ApiError> {
    match radius_km {
        None => Ok(default),
        Some(r) if r.is_finite() && r >= 0.0 => Ok(r),
        Some(r) => Err(ApiError::validation(
            request_id,
            format!("radius_km must be a non-negative number, got {r}"),
        )),
    }
}

/// Distance fields shared by every ranked listing.
#[derive(Debug, Serialize)]
pub(super) struct DistanceFields {
    /// Rounded to two decimals; ranking uses the unrounded value.
    pub distance_km: f64,
    pub distance_label: String,
}

impl DistanceFields {
    pub(super) fn new(km: f64) -> Self {
        Self {
            distance_km: round_km(km),
            distance_label: format_km(km),
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app<R: StoreRepository>(state: AppState<R>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::<R>))
        .route("/api/v1/stores", get(stores::list_stores::<R>))
        .route("/api/v1/stores/{public_id}", get(stores::get_store::<R>))
        .route("/api/v1/products", get(products::list_products::<R>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.repo.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
