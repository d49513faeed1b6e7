//! Inverse-distance weighted means, with optional population weighting
//!
//! Estimates a measure at each query point as a weighted average of the
//! measures taken at all reference points:
//!
//! ```text
//! m(x) = Σ(wj · mj) / Σ(wj)
//! where wj = T(d(x, yj)) · popj      (popj = 1 without population)
//! ```
//!
//! `T` is the chosen [`WeightTransform`]. Every query point scans every
//! reference point.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use distweight_core::{
    AggregationTable, CancellationToken, Coordinate, CoordinateSet, Error, QueryPoints,
    ReferencePoints, Result, ResultKind,
};
use distweight_parallel::ProcessingMode;

use super::weights::{validate_decay, WeightTransform, DEFAULT_DECAY};
use crate::distance::{dist_1tom, DistanceFunction};

/// Default number of rows between cancellation checks
pub const DEFAULT_CHECK_INTERVAL: usize = 100;

/// Parameters for weighted-mean interpolation
#[derive(Debug, Clone)]
pub struct WeightedMeanParams {
    /// Distance formula (default: Haversine)
    pub dist_function: DistanceFunction,
    /// Distance weight transform (default: level)
    pub transform: WeightTransform,
    /// Distance decay exponent (default: 2.0).
    /// Higher values give more weight to nearby points.
    pub decay: f64,
    /// Reference points at or below this distance (m) from a query point are
    /// treated as measured at the query point, and only their measures are
    /// averaged. The default of 0 snaps exact coincidences only.
    pub snap_distance: f64,
    /// Sequential or parallel row processing
    pub mode: ProcessingMode,
    /// Rows per batch between cancellation checks
    pub check_interval: usize,
    /// Checked before each batch; cancelling aborts the whole call
    pub cancel: CancellationToken,
}

impl Default for WeightedMeanParams {
    fn default() -> Self {
        Self {
            dist_function: DistanceFunction::Haversine,
            transform: WeightTransform::Level,
            decay: DEFAULT_DECAY,
            snap_distance: 0.0,
            mode: ProcessingMode::default(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            cancel: CancellationToken::new(),
        }
    }
}

impl WeightedMeanParams {
    /// Parameters from the string names of the distance function and transform.
    pub fn from_names(dist_function: &str, transform: &str, decay: f64) -> Result<Self> {
        Ok(Self {
            dist_function: dist_function.parse()?,
            transform: transform.parse()?,
            decay,
            ..Default::default()
        })
    }

    fn validate(&self) -> Result<()> {
        validate_decay(self.decay)?;
        if !(self.snap_distance >= 0.0) || !self.snap_distance.is_finite() {
            return Err(Error::InvalidParameter {
                name: "snap_distance",
                value: self.snap_distance.to_string(),
                reason: "must be finite and >= 0".into(),
            });
        }
        Ok(())
    }
}

/// Interpolate inverse-distance-weighted measures.
///
/// For each query point, averages the reference measures weighted by
/// inverse distance so that measures taken nearby count more.
///
/// # Returns
/// One `(id, wmeasure)` record per query point, in input order. A row whose
/// weights sum to zero holds NaN.
///
/// # Errors
/// - reference points without measures, or an empty reference set
/// - invalid decay or snap distance
/// - [`Error::Cancelled`] if `params.cancel` fires; no partial table is returned
pub fn dist_weighted_mean(
    query: &QueryPoints,
    reference: &ReferencePoints,
    params: &WeightedMeanParams,
) -> Result<AggregationTable> {
    weighted_mean(query, reference, None, params)
}

/// Interpolate population/inverse-distance-weighted measures.
///
/// Like [`dist_weighted_mean`], but each reference weight is also multiplied
/// by the reference point's population, so measures from nearby and more
/// populous areas count more. Reference points with zero population are
/// ignored; a query point whose reachable references all have zero
/// population gets NaN.
pub fn popdist_weighted_mean(
    query: &QueryPoints,
    reference: &ReferencePoints,
    params: &WeightedMeanParams,
) -> Result<AggregationTable> {
    let population = reference.population().ok_or_else(|| Error::InvalidParameter {
        name: "population",
        value: "none".into(),
        reason: "reference points carry no population column".into(),
    })?;
    weighted_mean(query, reference, Some(population), params)
}

fn weighted_mean(
    query: &QueryPoints,
    reference: &ReferencePoints,
    population: Option<&[f64]>,
    params: &WeightedMeanParams,
) -> Result<AggregationTable> {
    params.validate()?;
    let measures = reference.measures().ok_or_else(|| Error::InvalidParameter {
        name: "measures",
        value: "none".into(),
        reason: "reference points carry no measure column".into(),
    })?;
    if reference.is_empty() {
        return Err(Error::EmptyInput("reference points"));
    }

    tracing::debug!(
        n = query.len(),
        k = reference.len(),
        function = %params.dist_function,
        transform = %params.transform,
        decay = params.decay,
        population = population.is_some(),
        mode = ?params.mode,
        "weighted mean"
    );

    let row = WeightedRow {
        reference: reference.coords(),
        measures,
        population,
        params,
    };
    let x = query.coords();
    let values = params
        .mode
        .map_rows(query.len(), params.check_interval, &params.cancel, |i| row.eval(x.at(i)))?;

    let undefined = values.iter().filter(|v| v.is_nan()).count();
    if undefined > 0 {
        tracing::debug!(rows = undefined, "weighted mean undefined (NaN) for some rows");
    }

    query.to_table(ResultKind::WeightedMeasure, values)
}

/// Read-only inputs shared by every row
struct WeightedRow<'a> {
    reference: &'a CoordinateSet,
    measures: &'a [f64],
    population: Option<&'a [f64]>,
    params: &'a WeightedMeanParams,
}

impl WeightedRow<'_> {
    #[inline]
    fn mass(&self, j: usize) -> f64 {
        self.population.map_or(1.0, |p| p[j])
    }

    fn eval(&self, x: Coordinate) -> f64 {
        let snap = self.params.snap_distance;
        let dist = dist_1tom(x, self.reference, self.params.dist_function);

        // Measured here: average the coincident measures only
        let mut snap_w = 0.0;
        let mut snap_wm = 0.0;
        for (j, &d) in dist.iter().enumerate() {
            if d <= snap {
                let w = self.mass(j);
                snap_w += w;
                snap_wm += w * self.measures[j];
            }
        }
        if snap_w > 0.0 {
            return snap_wm / snap_w;
        }

        // Weights relative to the nearest reference with mass keep the largest
        // weight at its mass for any decay
        let nearest = dist
            .iter()
            .enumerate()
            .filter(|&(j, &d)| d > snap && self.mass(j) > 0.0)
            .map(|(_, &d)| d)
            .fold(f64::INFINITY, f64::min);
        if nearest == f64::INFINITY {
            return f64::NAN;
        }

        let transform = self.params.transform;
        let decay = self.params.decay;
        let mut sum_w = 0.0;
        let mut sum_wm = 0.0;
        for (j, &d) in dist.iter().enumerate() {
            if d <= snap {
                continue; // zero mass, see above
            }
            let w = transform.relative_weight(d, nearest, decay) * self.mass(j);
            sum_w += w;
            sum_wm += w * self.measures[j];
        }

        if sum_w > 0.0 {
            sum_wm / sum_w
        } else {
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn query() -> QueryPoints {
        let coords = CoordinateSet::new(vec![0.0, 0.5, 2.0], vec![0.0, 0.5, 2.0]).unwrap();
        QueryPoints::new(vec!["a".into(), "b".into(), "c".into()], coords).unwrap()
    }

    fn reference(measures: Vec<f64>) -> ReferencePoints {
        let coords = CoordinateSet::new(vec![0.0, 1.0, 0.0, 1.0], vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        ReferencePoints::new(coords).with_measures(measures).unwrap()
    }

    #[test]
    fn test_constant_measure() {
        let r = reference(vec![7.5; 4])
            .with_population(vec![10.0, 200.0, 0.0, 3.0])
            .unwrap();
        for transform in [WeightTransform::Level, WeightTransform::Log] {
            for dist_function in DistanceFunction::ALL {
                let params = WeightedMeanParams { dist_function, transform, ..Default::default() };
                for table in [
                    dist_weighted_mean(&query(), &r, &params).unwrap(),
                    popdist_weighted_mean(&query(), &r, &params).unwrap(),
                ] {
                    for v in table.values() {
                        assert_relative_eq!(v, 7.5, max_relative = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_constant_measure_with_extreme_decay() {
        // Far references: absolute weights d^-60 underflow to zero
        let coords = CoordinateSet::new(vec![90.0, 100.0], vec![0.0, 0.0]).unwrap();
        let r = ReferencePoints::new(coords)
            .with_measures(vec![5.0, 5.0])
            .unwrap()
            .with_population(vec![1.0, 1.0])
            .unwrap();
        let q = QueryPoints::numbered(CoordinateSet::new(vec![0.0], vec![0.0]).unwrap());

        for decay in [50.0, 60.0, 300.0] {
            for transform in [WeightTransform::Level, WeightTransform::Log] {
                let params = WeightedMeanParams { transform, decay, ..Default::default() };
                let plain = dist_weighted_mean(&q, &r, &params).unwrap().values()[0];
                let pop = popdist_weighted_mean(&q, &r, &params).unwrap().values()[0];
                assert_relative_eq!(plain, 5.0, max_relative = 1e-12);
                assert_relative_eq!(pop, 5.0, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_extreme_decay_picks_nearest() {
        // Close references: absolute weights d^-100 would saturate at f64::MAX
        let coords = CoordinateSet::new(vec![0.0, 0.0], vec![1e-9, 2e-9]).unwrap();
        let r = ReferencePoints::new(coords).with_measures(vec![1.0, 9.0]).unwrap();
        let q = QueryPoints::numbered(CoordinateSet::new(vec![0.0], vec![0.0]).unwrap());
        let params = WeightedMeanParams { decay: 100.0, ..Default::default() };
        let v = dist_weighted_mean(&q, &r, &params).unwrap().values()[0];
        assert_relative_eq!(v, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_coincident_point_takes_its_measure() {
        let table = dist_weighted_mean(&query(), &reference(vec![1.0, 2.0, 3.0, 4.0]), &Default::default())
            .unwrap();
        assert_eq!(table.get("a"), Some(1.0));
        assert!(table.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_center_is_average() {
        // (0.5, 0.5) is nearly equidistant from the four corners
        let table = dist_weighted_mean(&query(), &reference(vec![10.0, 20.0, 30.0, 40.0]), &Default::default())
            .unwrap();
        let center = table.get("b").unwrap();
        assert!((center - 25.0).abs() < 0.5, "center should be ~25, got {}", center);
    }

    #[test]
    fn test_nearest_dominates_with_high_decay() {
        let r = reference(vec![10.0, 20.0, 30.0, 40.0]);
        let low = WeightedMeanParams { decay: 1.0, ..Default::default() };
        let high = WeightedMeanParams { decay: 8.0, ..Default::default() };
        // (2, 2) is closest to (1, 1) → 40
        let v_low = dist_weighted_mean(&query(), &r, &low).unwrap().get("c").unwrap();
        let v_high = dist_weighted_mean(&query(), &r, &high).unwrap().get("c").unwrap();
        assert!((v_high - 40.0).abs() < (v_low - 40.0).abs());
        assert!(v_high > 38.5);
    }

    #[test]
    fn test_population_shifts_estimate() {
        let r = reference(vec![10.0, 20.0, 30.0, 40.0])
            .with_population(vec![1.0, 1.0, 1.0, 1000.0])
            .unwrap();
        let plain = dist_weighted_mean(&query(), &r, &Default::default()).unwrap();
        let pop = popdist_weighted_mean(&query(), &r, &Default::default()).unwrap();
        assert!(pop.get("b").unwrap() > plain.get("b").unwrap());
        assert!(pop.get("b").unwrap() > 39.0);
    }

    #[test]
    fn test_unit_population_equals_plain() {
        let r = reference(vec![10.0, 20.0, 30.0, 40.0]).with_population(vec![1.0; 4]).unwrap();
        let plain = dist_weighted_mean(&query(), &r, &Default::default()).unwrap();
        let pop = popdist_weighted_mean(&query(), &r, &Default::default()).unwrap();
        assert_eq!(plain, pop);
    }

    #[test]
    fn test_zero_population_is_nan_row() {
        let r = reference(vec![10.0, 20.0, 30.0, 40.0]).with_population(vec![0.0; 4]).unwrap();
        let table = popdist_weighted_mean(&query(), &r, &Default::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_coincident_zero_population_is_skipped() {
        // The coincident reference has no population, so the others decide
        let r = reference(vec![100.0, 20.0, 20.0, 20.0])
            .with_population(vec![0.0, 1.0, 1.0, 1.0])
            .unwrap();
        let table = popdist_weighted_mean(&query(), &r, &Default::default()).unwrap();
        assert_relative_eq!(table.get("a").unwrap(), 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_snap_distance() {
        let r = reference(vec![10.0, 20.0, 30.0, 40.0]);
        // Within 200 km of (2, 2) there is only (1, 1)
        let params = WeightedMeanParams { snap_distance: 200_000.0, ..Default::default() };
        let table = dist_weighted_mean(&query(), &r, &params).unwrap();
        assert_eq!(table.get("c"), Some(40.0));
    }

    #[test]
    fn test_missing_columns() {
        let coords = CoordinateSet::new(vec![0.0], vec![0.0]).unwrap();
        let bare = ReferencePoints::new(coords);
        assert!(dist_weighted_mean(&query(), &bare, &Default::default()).unwrap_err().is_invalid_argument());
        let measured = reference(vec![1.0; 4]);
        assert!(popdist_weighted_mean(&query(), &measured, &Default::default())
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_empty_reference() {
        let r = ReferencePoints::new(CoordinateSet::default()).with_measures(vec![]).unwrap();
        let err = dist_weighted_mean(&query(), &r, &Default::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn test_empty_query() {
        let q = QueryPoints::new(vec![], CoordinateSet::default()).unwrap();
        let table = dist_weighted_mean(&q, &reference(vec![1.0; 4]), &Default::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_names() {
        let p = WeightedMeanParams::from_names("Vincenty", "log", 3.0).unwrap();
        assert_eq!(p.dist_function, DistanceFunction::Vincenty);
        assert_eq!(p.transform, WeightTransform::Log);
        assert!(WeightedMeanParams::from_names("Euclidean", "level", 2.0).unwrap_err().is_invalid_argument());
        assert!(WeightedMeanParams::from_names("Haversine", "exp", 2.0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_invalid_params_fail_before_work() {
        let params = WeightedMeanParams { decay: -2.0, ..Default::default() };
        assert!(dist_weighted_mean(&query(), &reference(vec![1.0; 4]), &params).is_err());
        let params = WeightedMeanParams { snap_distance: f64::NAN, ..Default::default() };
        assert!(dist_weighted_mean(&query(), &reference(vec![1.0; 4]), &params).is_err());
    }

    #[test]
    fn test_cancelled() {
        let params = WeightedMeanParams::default();
        params.cancel.cancel();
        let err = dist_weighted_mean(&query(), &reference(vec![1.0; 4]), &params).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_modes_agree() {
        let r = reference(vec![10.0, 20.0, 30.0, 40.0]);
        let results: Vec<_> = [
            ProcessingMode::Sequential,
            ProcessingMode::Parallel,
            ProcessingMode::ParallelWith(2),
        ]
        .into_iter()
        .map(|mode| {
            let params = WeightedMeanParams { mode, check_interval: 1, ..Default::default() };
            dist_weighted_mean(&query(), &r, &params).unwrap()
        })
        .collect();
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0], results[2]);
    }
}
