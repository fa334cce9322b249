use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A coordinate pair in GeoJSON order, serialized as `[lng, lat]`.
/// This is the order the routing service speaks and the order the output
/// documents carry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat(pub f64, pub f64);

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self(lng, lat)
    }

    pub const fn lng(&self) -> f64 {
        self.0
    }

    pub const fn lat(&self) -> f64 {
        self.1
    }

    /// Squared euclidean distance in raw lng/lat space, no projection
    /// correction. Only ever compared against other squared distances
    /// between nearby points.
    pub fn sq_dist(&self, other: &Self) -> f64 {
        let lng = self.0 - other.0;
        let lat = self.1 - other.1;
        lng * lng + lat * lat
    }
}

impl Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{},{}", self.0, self.1))
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self(lng, lat)
    }
}

#[test]
fn sq_dist_test() {
    let a = LngLat::new(139.7, 35.6);
    let b = LngLat::new(139.7, 35.6);
    assert_eq!(a.sq_dist(&b), 0.0);

    let c = LngLat::new(139.8, 35.5);
    assert!((a.sq_dist(&c) - 0.02).abs() < 1e-12);
}

#[test]
fn serde_pair_order_test() {
    let point = LngLat::new(130.4017, 33.5902);
    let json = serde_json::to_string(&point).unwrap();
    assert_eq!(json, "[130.4017,33.5902]");

    let back: LngLat = serde_json::from_str(&json).unwrap();
    assert_eq!(back, point);
}
