use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use pasaley_core::{annotate, apply_product_query, format_price, ProductQuery, ProductSort, Ranked};
use pasaley_db::{ProductWithStoreRow, StoreRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    map_db_error, radius_from_query, reference_from_query, ApiError, ApiResponse, AppState,
    DistanceFields, ResponseMeta,
};

#[derive(Debug, Serialize)]
pub(super) struct StoreRef {
    id: Uuid,
    name: String,
    address: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    id: Uuid,
    name: String,
    price_cents: i32,
    price_label: String,
    unit: Option<String>,
    image_url: Option<String>,
    in_stock: bool,
    store: StoreRef,
    #[serde(flatten)]
    distance: DistanceFields,
}

impl From<Ranked<ProductWithStoreRow>> for ProductItem {
    fn from(ranked: Ranked<ProductWithStoreRow>) -> Self {
        let row = ranked.item;
        Self {
            id: row.product.public_id,
            price_label: format_price(row.product.price_cents),
            name: row.product.name,
            price_cents: row.product.price_cents,
            unit: row.product.unit,
            image_url: row.product.image_url,
            in_stock: row.product.in_stock,
            store: StoreRef {
                id: row.store_public_id,
                name: row.store_name,
                address: row.store_address,
            },
            distance: DistanceFields::new(ranked.distance_km),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ExploreQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub q: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub sort: ProductSort,
}

pub(super) async fn list_products<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ExploreQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ProductItem>>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation(req_id.0.clone(), e.body_text()))?;
    let reference = reference_from_query(&req_id.0, query.lat, query.lng, state.default_reference)?;
    let radius_km = radius_from_query(&req_id.0, query.radius_km, state.default_radius_km)?;

    let rows = state
        .repo
        .list_products_with_stores()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let annotated = rows
        .into_iter()
        .map(|row| annotate(reference.coordinate, row))
        .collect();

    let filters = ProductQuery {
        search: query.q,
        radius_km,
        in_stock_only: query.in_stock,
        sort: query.sort,
    };

    let data = apply_product_query(annotated, &filters)
        .into_iter()
        .map(ProductItem::from)
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0)
            .with_reference(reference)
            .with_radius(radius_km),
    }))
}
