//! Planar coordinates in degree space.
//!
//! Distances are plain Euclidean norms over `(lat, lng)`. This is an
//! approximation that ignores the shape of the earth, which is fine for
//! the short hops the simulator drives.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{Add, Mul, Sub},
};

/// A position in degrees.
///
/// Serialized as a two-element `[lat, lng]` array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Euclidean distance in degree space
    pub fn distance(&self, other: LatLng) -> f64 {
        (other - *self).norm()
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Componentwise offset between two positions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Delta {
    pub lat: f64,
    pub lng: f64,
}

impl Delta {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn norm(&self) -> f64 {
        self.lat.hypot(self.lng)
    }

    /// Scale to unit length. Returns `None` for a zero offset.
    pub fn normalize(&self) -> Option<Delta> {
        let norm = self.norm();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        Some(Delta {
            lat: self.lat / norm,
            lng: self.lng / norm,
        })
    }
}

impl Sub for LatLng {
    type Output = Delta;

    fn sub(self, rhs: LatLng) -> Delta {
        Delta {
            lat: self.lat - rhs.lat,
            lng: self.lng - rhs.lng,
        }
    }
}

impl Add<Delta> for LatLng {
    type Output = LatLng;

    fn add(self, rhs: Delta) -> LatLng {
        LatLng {
            lat: self.lat + rhs.lat,
            lng: self.lng + rhs.lng,
        }
    }
}

impl Mul<f64> for Delta {
    type Output = Delta;

    fn mul(self, rhs: f64) -> Delta {
        Delta {
            lat: self.lat * rhs,
            lng: self.lng * rhs,
        }
    }
}
