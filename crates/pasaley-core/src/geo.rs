//! Coordinates and great-circle distance.
//!
//! Distances are computed with the haversine formula on a sphere of mean
//! Earth radius. Everything here is pure `f64` arithmetic; rounding happens
//! only in the display helpers.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Reference point used when no location can be acquired (Kathmandu city center).
pub const DEFAULT_REFERENCE: Coordinate = Coordinate {
    lat: 27.7172,
    lng: 85.324,
};

/// A validated latitude/longitude pair in decimal degrees.
///
/// Latitude is within `[-90, 90]` and longitude within `[-180, 180]`. The only
/// ways to build one are [`Coordinate::new`] and deserialization, and both
/// enforce the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatLng")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<LatLng> for Coordinate {
    type Error = CoreError;

    fn try_from(raw: LatLng) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when either component is NaN
    /// or outside its valid range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Ok(Self { lat, lng })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Great-circle distance between `a` and `b` in kilometers.
///
/// Symmetric, zero for identical points, never negative. The intermediate
/// term is clamped to `[0, 1]` so rounding noise near antipodal points cannot
/// turn into NaN.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Where a reference point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSource {
    /// Given explicitly by the caller.
    Supplied,
    /// Acquired from a location provider.
    Located,
    /// Substituted because nothing else was available.
    Default,
}

/// The point distances are measured from, and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub coordinate: Coordinate,
    pub source: ReferenceSource,
}

impl ReferencePoint {
    /// Use `supplied` when present, otherwise fall back to `default`.
    #[must_use]
    pub fn supplied_or(supplied: Option<Coordinate>, default: Coordinate) -> Self {
        match supplied {
            Some(coordinate) => Self {
                coordinate,
                source: ReferenceSource::Supplied,
            },
            None => Self {
                coordinate: default,
                source: ReferenceSource::Default,
            },
        }
    }
}

/// Round a distance to two decimal places.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Human-readable distance: metres below one kilometer, otherwise kilometers
/// with one decimal (`"850 m"`, `"1.7 km"`).
#[must_use]
pub fn format_km(km: f64) -> String {
    if km < 1.0 {
        #[allow(clippy::cast_possible_truncation)]
        let metres = (km * 1000.0).round() as i64;
        format!("{metres} m")
    } else {
        format!("{km:.1} km")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).expect("valid coordinate")
    }

    #[test]
    fn new_accepts_bounds_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn new_rejects_latitude_91() {
        let err = Coordinate::new(91.0, 0.0).unwrap_err();
        assert_eq!(err, CoreError::InvalidCoordinate { lat: 91.0, lng: 0.0 });
    }

    #[test]
    fn new_rejects_longitude_out_of_range_and_nan() {
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn deserialize_validates_bounds() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 27.7172, "lng": 85.324}"#).unwrap();
        assert_eq!(ok, DEFAULT_REFERENCE);

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 91.0, "lng": 0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        for p in [c(27.7172, 85.324), c(90.0, 0.0), c(-90.0, 180.0), c(0.0, 0.0)] {
            assert!(haversine_km(p, p).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (c(27.7172, 85.324), c(27.73, 85.315)),
            (c(-33.8688, 151.2093), c(51.5074, -0.1278)),
            (c(89.9, 10.0), c(-89.9, -170.0)),
        ];
        for (a, b) in pairs {
            assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn kathmandu_neighbourhood_distance() {
        let d = haversine_km(c(27.7172, 85.3240), c(27.7300, 85.3150));
        assert!((d - 1.68).abs() < 0.05, "got {d}");
        assert!((round_km(d) - 1.68).abs() < f64::EPSILON);
    }

    #[test]
    fn antipodal_equator_is_half_circumference() {
        let d = haversine_km(c(0.0, 0.0), c(0.0, 180.0));
        assert!((d - 20_015.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn pole_to_pole_is_finite() {
        let d = haversine_km(c(90.0, 0.0), c(-90.0, 0.0));
        assert!(d.is_finite());
        assert!((d - 20_015.0).abs() < 5.0);
    }

    #[test]
    fn format_km_uses_metres_below_one_km() {
        assert_eq!(format_km(0.85), "850 m");
        assert_eq!(format_km(0.0), "0 m");
    }

    #[test]
    fn format_km_uses_one_decimal_from_one_km() {
        assert_eq!(format_km(1.0), "1.0 km");
        assert_eq!(format_km(1.676), "1.7 km");
        assert_eq!(format_km(12.34), "12.3 km");
    }

    #[test]
    fn supplied_or_prefers_supplied_point() {
        let here = c(27.73, 85.315);
        let point = ReferencePoint::supplied_or(Some(here), DEFAULT_REFERENCE);
        assert_eq!(point.coordinate, here);
        assert_eq!(point.source, ReferenceSource::Supplied);

        let point = ReferencePoint::supplied_or(None, DEFAULT_REFERENCE);
        assert_eq!(point.coordinate, DEFAULT_REFERENCE);
        assert_eq!(point.source, ReferenceSource::Default);
    }

    #[test]
    fn display_uses_four_decimals() {
        assert_eq!(DEFAULT_REFERENCE.to_string(), "27.7172, 85.3240");
    }
}
