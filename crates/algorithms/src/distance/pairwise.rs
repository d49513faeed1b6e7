//! Pairwise distance evaluators
//!
//! Four query shapes over the same per-pair primitive:
//! - one-to-one: scalar
//! - one-to-many: one coordinate against a set of k
//! - paired: `x[i]` against `y[i]` for two sets of equal size
//! - many-to-many: n × k matrix, `m[[i, j]] = d(x[i], y[j])`
//!
//! The `*_by_name` variants resolve the function name once, before any
//! distance is computed, and fail with an invalid-argument error for unknown
//! names.

use ndarray::Array2;
use rayon::prelude::*;

use distweight_core::{Coordinate, CoordinateSet, Error, Result};

use super::DistanceFunction;

/// Distance in meters between two coordinates.
pub fn dist_1to1(x: Coordinate, y: Coordinate, fun: DistanceFunction) -> f64 {
    fun.distance(x, y)
}

/// Distances in meters from `x` to every coordinate of `y`, in input order.
pub fn dist_1tom(x: Coordinate, y: &CoordinateSet, fun: DistanceFunction) -> Vec<f64> {
    let f = fun.as_fn();
    y.iter().map(|c| f(x, c)).collect()
}

/// Distances in meters between corresponding coordinates of `x` and `y`.
///
/// Fails with [`Error::LengthMismatch`] if the sets differ in size.
pub fn dist_paired(x: &CoordinateSet, y: &CoordinateSet, fun: DistanceFunction) -> Result<Vec<f64>> {
    Error::check_len("paired coordinates", x.len(), y.len())?;
    let f = fun.as_fn();
    Ok(x.iter().zip(y.iter()).map(|(a, b)| f(a, b)).collect())
}

/// Distance matrix in meters: one row per coordinate of `x`, one column per
/// coordinate of `y`.
///
/// Rows are computed in parallel.
pub fn dist_mtom(x: &CoordinateSet, y: &CoordinateSet, fun: DistanceFunction) -> Result<Array2<f64>> {
    let n = x.len();
    let k = y.len();
    let f = fun.as_fn();

    let data: Vec<f64> = (0..n)
        .into_par_iter()
        .flat_map(|i| {
            let xi = x.at(i);
            let mut row_data = Vec::with_capacity(k);
            for yj in y.iter() {
                row_data.push(f(xi, yj));
            }
            row_data
        })
        .collect();

    Array2::from_shape_vec((n, k), data).map_err(|e| Error::Other(e.to_string()))
}

/// [`dist_1to1`] with the function given by name.
pub fn dist_1to1_by_name(x: Coordinate, y: Coordinate, fun: &str) -> Result<f64> {
    let fun: DistanceFunction = fun.parse()?;
    Ok(dist_1to1(x, y, fun))
}

/// [`dist_1tom`] with the function given by name.
pub fn dist_1tom_by_name(x: Coordinate, y: &CoordinateSet, fun: &str) -> Result<Vec<f64>> {
    let fun: DistanceFunction = fun.parse()?;
    Ok(dist_1tom(x, y, fun))
}

/// [`dist_paired`] with the function given by name.
pub fn dist_paired_by_name(x: &CoordinateSet, y: &CoordinateSet, fun: &str) -> Result<Vec<f64>> {
    let fun: DistanceFunction = fun.parse()?;
    dist_paired(x, y, fun)
}

/// [`dist_mtom`] with the function given by name.
pub fn dist_mtom_by_name(x: &CoordinateSet, y: &CoordinateSet, fun: &str) -> Result<Array2<f64>> {
    let fun: DistanceFunction = fun.parse()?;
    dist_mtom(x, y, fun)
}
