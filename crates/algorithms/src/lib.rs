//! # distweight Algorithms
//!
//! Geodesic distances and distance-weighted aggregation over lon/lat points.
//!
//! ## Available Algorithm Categories
//!
//! - **distance**: Haversine and Vincenty distances, pairwise evaluators
//! - **interpolation**: Weight transforms, weighted means, minimum distance

pub mod distance;
pub mod interpolation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::distance::{
        dist_1to1, dist_1tom, dist_mtom, dist_paired, haversine, vincenty, DistanceFunction,
        Ellipsoid,
    };
    pub use crate::interpolation::{
        dist_min, dist_weighted_mean, inverse_value, popdist_weighted_mean, MinDistanceParams,
        WeightTransform, WeightedMeanParams,
    };
    pub use distweight_core::prelude::*;
    pub use distweight_parallel::ProcessingMode;
}
