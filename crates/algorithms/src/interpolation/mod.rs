//! Distance-weighted aggregation of reference measures at query points
//!
//! - Weight transforms: turn distances into inverse-distance weights
//! - Weighted mean: inverse-distance weighted measures, optionally population weighted
//! - Minimum distance: distance to the closest reference point
//!
//! All aggregations scan the full reference set for every query point and
//! return one record per query point, in input order.

mod min_distance;
mod weighted_mean;
mod weights;

pub use min_distance::{dist_min, dist_min_by_name, MinDistanceParams};
pub use weighted_mean::{
    dist_weighted_mean, popdist_weighted_mean, WeightedMeanParams, DEFAULT_CHECK_INTERVAL,
};
pub use weights::{
    inverse_value, inverse_value_by_name, validate_decay, WeightTransform, DEFAULT_DECAY,
    MIN_WEIGHT_DISTANCE,
};
