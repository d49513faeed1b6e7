//! Geodesic distance between lon/lat coordinates
//!
//! Two distance primitives are available:
//! - Haversine: great-circle distance on a sphere of mean Earth radius
//! - Vincenty: iterative inverse solution on the WGS84 ellipsoid
//!
//! Both take coordinates in decimal degrees and return meters. A
//! [`DistanceFunction`] selects one of them once per call; the pairwise
//! evaluators then apply it to every pair without further lookups.

mod haversine;
mod pairwise;
mod vincenty;

use std::fmt;
use std::str::FromStr;

use distweight_core::{Coordinate, Error};

pub use haversine::{haversine, EARTH_MEAN_RADIUS};
pub use pairwise::{
    dist_1to1, dist_1to1_by_name, dist_1tom, dist_1tom_by_name, dist_mtom, dist_mtom_by_name,
    dist_paired, dist_paired_by_name,
};
pub use vincenty::{
    vincenty, vincenty_inverse, vincenty_inverse_with, Ellipsoid, VINCENTY_MAX_ITERATIONS,
    VINCENTY_TOLERANCE,
};

/// Convert degrees to radians
#[inline]
pub fn deg_to_rad(degree: f64) -> f64 {
    degree * std::f64::consts::PI / 180.0
}

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(radian: f64) -> f64 {
    radian * 180.0 / std::f64::consts::PI
}

/// Signature shared by the distance primitives
pub type DistanceFn = fn(Coordinate, Coordinate) -> f64;

/// Selectable distance formula.
///
/// Parsed from the case-sensitive names `"Haversine"` and `"Vincenty"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceFunction {
    /// Spherical great-circle distance
    #[default]
    Haversine,
    /// Ellipsoidal (WGS84) geodesic distance
    Vincenty,
}

impl DistanceFunction {
    /// All supported functions
    pub const ALL: [DistanceFunction; 2] = [DistanceFunction::Haversine, DistanceFunction::Vincenty];

    /// Canonical name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            DistanceFunction::Haversine => "Haversine",
            DistanceFunction::Vincenty => "Vincenty",
        }
    }

    /// The primitive behind this selection, for use in tight loops
    #[inline]
    pub fn as_fn(self) -> DistanceFn {
        match self {
            DistanceFunction::Haversine => haversine,
            DistanceFunction::Vincenty => vincenty,
        }
    }

    /// Distance in meters between `a` and `b`
    #[inline]
    pub fn distance(self, a: Coordinate, b: Coordinate) -> f64 {
        (self.as_fn())(a, b)
    }
}

impl FromStr for DistanceFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Haversine" => Ok(DistanceFunction::Haversine),
            "Vincenty" => Ok(DistanceFunction::Vincenty),
            _ => Err(Error::UnknownDistanceFunction(s.to_string())),
        }
    }
}

impl fmt::Display for DistanceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
