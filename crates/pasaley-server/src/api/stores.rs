use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use pasaley_core::{annotate, format_price, rank, Ranked};
use pasaley_db::{ProductRow, StoreRepository, StoreRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    map_db_error, radius_from_query, reference_from_query, ApiError, ApiResponse, AppState,
    DistanceFields, ResponseMeta,
};

#[derive(Debug, Serialize)]
pub(super) struct StoreItem {
    id: Uuid,
    name: String,
    description: Option<String>,
    address: Option<String>,
    lat: f64,
    lng: f64,
    #[serde(flatten)]
    distance: DistanceFields,
}

impl From<Ranked<StoreRow>> for StoreItem {
    fn from(ranked: Ranked<StoreRow>) -> Self {
        let store = ranked.item;
        Self {
            id: store.public_id,
            name: store.name,
            description: store.description,
            address: store.address,
            lat: store.coordinate.lat(),
            lng: store.coordinate.lng(),
            distance: DistanceFields::new(ranked.distance_km),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct StoreProductItem {
    id: Uuid,
    name: String,
    price_cents: i32,
    price_label: String,
    unit: Option<String>,
    image_url: Option<String>,
    in_stock: bool,
}

impl From<ProductRow> for StoreProductItem {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.public_id,
            price_label: format_price(row.price_cents),
            name: row.name,
            price_cents: row.price_cents,
            unit: row.unit,
            image_url: row.image_url,
            in_stock: row.in_stock,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct StoreDetail {
    #[serde(flatten)]
    store: StoreItem,
    products: Vec<StoreProductItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReferenceQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

pub(super) async fn list_stores<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<StoreItem>>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation(req_id.0.clone(), e.body_text()))?;
    let reference = reference_from_query(&req_id.0, query.lat, query.lng, state.default_reference)?;
    let radius_km = radius_from_query(&req_id.0, query.radius_km, state.default_radius_km)?;

    let stores = state
        .repo
        .list_active_stores()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let fetched = stores.len();
    let data: Vec<StoreItem> = rank(reference.coordinate, stores, radius_km)
        .into_iter()
        .map(StoreItem::from)
        .collect();

    tracing::debug!(
        fetched,
        matched = data.len(),
        radius_km,
        reference = %reference.coordinate,
        "ranked nearby stores"
    );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0)
            .with_reference(reference)
            .with_radius(radius_km),
    }))
}

pub(super) async fn get_store<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    public_id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<ReferenceQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<StoreDetail>>, ApiError> {
    let Path(public_id) =
        public_id.map_err(|_| ApiError::validation(req_id.0.clone(), "invalid store id"))?;
    let Query(query) = query.map_err(|e| ApiError::validation(req_id.0.clone(), e.body_text()))?;
    let reference = reference_from_query(&req_id.0, query.lat, query.lng, state.default_reference)?;

    let store = state
        .repo
        .get_store(public_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("store {public_id} not found"),
            )
        })?;

    let products = state
        .repo
        .list_store_products(store.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = StoreDetail {
        store: StoreItem::from(annotate(reference.coordinate, store)),
        products: products.into_iter().map(StoreProductItem::from).collect(),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0).with_reference(reference),
    }))
}
