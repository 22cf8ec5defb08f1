//! Product explore filters: search, radius, stock, and ordering.
//!
//! Products are ranked by the distance of the store that sells them, so the
//! same [`Ranked`] wrapper the store listing uses carries the distance here.

use serde::{Deserialize, Serialize};

use crate::rank::{rerank, Ranked};

/// Fields the explore filters need from a product listing.
pub trait Browsable {
    fn product_name(&self) -> &str;
    fn store_name(&self) -> &str;
    fn in_stock(&self) -> bool;
    fn price_cents(&self) -> i32;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSort {
    #[default]
    Distance,
    Price,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Case-insensitive substring matched against product and store names.
    pub search: Option<String>,
    pub radius_km: f64,
    pub in_stock_only: bool,
    pub sort: ProductSort,
}

/// Apply the explore filters to products annotated with their store distance.
///
/// Both sort orders are stable, so products with equal keys keep the order
/// they were fetched in.
#[must_use]
pub fn apply_product_query<T: Browsable>(
    products: Vec<Ranked<T>>,
    query: &ProductQuery,
) -> Vec<Ranked<T>> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<Ranked<T>> = rerank(products, query.radius_km)
        .into_iter()
        .filter(|p| match &needle {
            Some(n) => {
                p.item.product_name().to_lowercase().contains(n)
                    || p.item.store_name().to_lowercase().contains(n)
            }
            None => true,
        })
        .filter(|p| !query.in_stock_only || p.item.in_stock())
        .collect();

    match query.sort {
        ProductSort::Distance => {
            filtered.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        }
        ProductSort::Price => filtered.sort_by_key(|p| p.item.price_cents()),
    }

    filtered
}

/// Format minor currency units as a rupee price, e.g. `25000` → `"NPR 250.00"`.
#[must_use]
pub fn format_price(price_cents: i32) -> String {
    let sign = if price_cents < 0 { "-" } else { "" };
    let abs = price_cents.unsigned_abs();
    format!("NPR {sign}{}.{:02}", abs / 100, abs % 100)
}
