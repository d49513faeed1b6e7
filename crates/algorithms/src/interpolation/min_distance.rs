//! Minimum distance to a reference set
//!
//! For each query point, the distance to the closest reference point.
//! Brute force: every query point scans every reference point.

use distweight_core::{
    AggregationTable, CancellationToken, Error, QueryPoints, ReferencePoints, Result, ResultKind,
};
use distweight_parallel::ProcessingMode;

use super::weighted_mean::DEFAULT_CHECK_INTERVAL;
use crate::distance::DistanceFunction;

/// Parameters for the minimum-distance reduction
#[derive(Debug, Clone)]
pub struct MinDistanceParams {
    /// Distance formula (default: Haversine)
    pub dist_function: DistanceFunction,
    /// Sequential or parallel row processing
    pub mode: ProcessingMode,
    /// Rows per batch between cancellation checks
    pub check_interval: usize,
    /// Checked before each batch; cancelling aborts the whole call
    pub cancel: CancellationToken,
}

impl Default for MinDistanceParams {
    fn default() -> Self {
        Self {
            dist_function: DistanceFunction::Haversine,
            mode: ProcessingMode::default(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            cancel: CancellationToken::new(),
        }
    }
}

/// Find the minimum distance in meters from each query point to the reference set.
///
/// # Returns
/// One `(id, mindist)` record per query point, in input order. NaN distances
/// (from NaN coordinates) are ignored; a row with only NaN distances is NaN.
///
/// # Errors
/// - [`Error::EmptyInput`] for an empty reference set
/// - [`Error::Cancelled`] if `params.cancel` fires
pub fn dist_min(
    query: &QueryPoints,
    reference: &ReferencePoints,
    params: &MinDistanceParams,
) -> Result<AggregationTable> {
    if reference.is_empty() {
        return Err(Error::EmptyInput("reference points"));
    }

    tracing::debug!(
        n = query.len(),
        k = reference.len(),
        function = %params.dist_function,
        mode = ?params.mode,
        "minimum distance"
    );

    let f = params.dist_function.as_fn();
    let x = query.coords();
    let y = reference.coords();

    let values = params.mode.map_rows(query.len(), params.check_interval, &params.cancel, |i| {
        let xi = x.at(i);
        let min = y.iter().map(|yj| f(xi, yj)).fold(f64::INFINITY, f64::min);
        if min == f64::INFINITY {
            f64::NAN
        } else {
            min
        }
    })?;

    query.to_table(ResultKind::MinDistance, values)
}

/// [`dist_min`] with the distance function given by name.
pub fn dist_min_by_name(
    query: &QueryPoints,
    reference: &ReferencePoints,
    dist_function: &str,
) -> Result<AggregationTable> {
    let params = MinDistanceParams {
        dist_function: dist_function.parse()?,
        ..Default::default()
    };
    dist_min(query, reference, &params)
}
