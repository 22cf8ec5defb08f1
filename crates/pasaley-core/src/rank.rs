//! Distance-based filtering and ordering of location-bearing records.

use serde::Serialize;

use crate::geo::{haversine_km, Coordinate};

/// Anything that can be placed on the map.
pub trait Located {
    fn coordinate(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl<T: Located> Located for &T {
    fn coordinate(&self) -> Coordinate {
        (*self).coordinate()
    }
}

/// A candidate paired with its distance from the reference point.
///
/// The distance is derived on every ranking pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub item: T,
    pub distance_km: f64,
}

/// Attach the distance from `reference` to `item` without filtering.
#[must_use]
pub fn annotate<T: Located>(reference: Coordinate, item: T) -> Ranked<T> {
    let distance_km = haversine_km(reference, item.coordinate());
    Ranked { item, distance_km }
}

/// Keep candidates within `radius_km` of `reference`, nearest first.
///
/// The radius is inclusive and compared exactly: a candidate at precisely
/// `radius_km` is kept, and a radius of zero keeps only co-located candidates.
/// Equal distances keep their input order.
#[must_use]
pub fn rank<T, I>(reference: Coordinate, candidates: I, radius_km: f64) -> Vec<Ranked<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    let mut ranked: Vec<Ranked<T>> = candidates
        .into_iter()
        .map(|item| annotate(reference, item))
        .filter(|r| r.distance_km <= radius_km)
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// Narrow an already-ranked set to a new radius without recomputing distances.
///
/// Ordering is preserved. Widening the radius beyond the one the set was
/// ranked with cannot bring back dropped candidates; rank again for that.
#[must_use]
pub fn rerank<T>(ranked: Vec<Ranked<T>>, radius_km: f64) -> Vec<Ranked<T>> {
    ranked
        .into_iter()
        .filter(|r| r.distance_km <= radius_km)
        .collect()
}
