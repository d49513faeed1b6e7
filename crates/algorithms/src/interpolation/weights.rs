//! Inverse-distance weight transforms
//!
//! Turns a distance into an interpolation weight that decays with distance:
//!
//! ```text
//! level: w = d^(-decay)
//! log:   w = ln(1 + d)^(-decay)
//! ```
//!
//! Distances below [`MIN_WEIGHT_DISTANCE`] are clamped to it before the
//! transform, so a zero distance yields a large but finite weight instead of
//! infinity.

use std::fmt;
use std::str::FromStr;

use distweight_core::{Error, Result};

/// Default distance decay exponent
pub const DEFAULT_DECAY: f64 = 2.0;

/// Smallest distance (m) fed into a transform
pub const MIN_WEIGHT_DISTANCE: f64 = 1e-10;

/// Distance weight transform.
///
/// Parsed from the case-sensitive names `"level"` and `"log"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeightTransform {
    /// Inverse power of the distance
    #[default]
    Level,
    /// Inverse power of `ln(1 + d)`; decays more slowly with distance than `Level`
    Log,
}

impl WeightTransform {
    /// Canonical name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            WeightTransform::Level => "level",
            WeightTransform::Log => "log",
        }
    }

    /// Weight for a single distance in meters.
    ///
    /// NaN distances give NaN weights. The result is capped at `f64::MAX`.
    #[inline]
    pub fn weight(self, distance: f64, decay: f64) -> f64 {
        if distance.is_nan() {
            return f64::NAN;
        }
        self.base(distance).powf(-decay).min(f64::MAX)
    }

    /// Weight of `distance` scaled so that a point at `nearest` weighs 1.
    ///
    /// Equals `weight(distance) / weight(nearest)` but is computed as a ratio
    /// of bases, so it stays in `[0, 1]` for `distance >= nearest` whatever
    /// the decay. Normalized weighted means are unchanged by the scaling.
    #[inline]
    pub fn relative_weight(self, distance: f64, nearest: f64, decay: f64) -> f64 {
        if distance.is_nan() {
            return f64::NAN;
        }
        (self.base(nearest) / self.base(distance)).powf(decay)
    }

    #[inline]
    fn base(self, distance: f64) -> f64 {
        let d = distance.max(MIN_WEIGHT_DISTANCE);
        match self {
            WeightTransform::Level => d,
            WeightTransform::Log => d.ln_1p(),
        }
    }
}

impl FromStr for WeightTransform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "level" => Ok(WeightTransform::Level),
            "log" => Ok(WeightTransform::Log),
            _ => Err(Error::UnknownTransform(s.to_string())),
        }
    }
}

impl fmt::Display for WeightTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check that a decay exponent is usable: finite and non-negative.
pub fn validate_decay(decay: f64) -> Result<()> {
    if !decay.is_finite() || decay < 0.0 {
        return Err(Error::InvalidParameter {
            name: "decay",
            value: decay.to_string(),
            reason: "must be finite and >= 0".into(),
        });
    }
    Ok(())
}

/// Weights for a vector of distances, one per distance.
pub fn inverse_value(distances: &[f64], decay: f64, transform: WeightTransform) -> Result<Vec<f64>> {
    validate_decay(decay)?;
    Ok(distances.iter().map(|&d| transform.weight(d, decay)).collect())
}

/// [`inverse_value`] with the transform given by name.
pub fn inverse_value_by_name(distances: &[f64], decay: f64, transform: &str) -> Result<Vec<f64>> {
    let transform: WeightTransform = transform.parse()?;
    inverse_value(distances, decay, transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_level() {
        assert_relative_eq!(WeightTransform::Level.weight(10.0, 2.0), 0.01, epsilon = 1e-15);
        assert_relative_eq!(WeightTransform::Level.weight(4.0, 0.5), 0.5, epsilon = 1e-15);
        assert_eq!(WeightTransform::Level.weight(1234.5, 0.0), 1.0);
    }

    #[test]
    fn test_log() {
        let d = std::f64::consts::E - 1.0; // ln(1 + d) = 1
        assert_relative_eq!(WeightTransform::Log.weight(d, 3.0), 1.0, epsilon = 1e-12);
        let w = WeightTransform::Log.weight(1000.0, 2.0);
        assert_relative_eq!(w, 1.0 / 1001.0_f64.ln().powi(2), max_relative = 1e-12);
    }

    #[test]
    fn test_monotone_decreasing() {
        for t in [WeightTransform::Level, WeightTransform::Log] {
            let ws = inverse_value(&[1.0, 10.0, 100.0, 1e4, 1e6], 2.0, t).unwrap();
            assert!(ws.windows(2).all(|p| p[0] > p[1]), "{:?}: {:?}", t, ws);
        }
    }

    #[test]
    fn test_zero_distance_is_finite() {
        for t in [WeightTransform::Level, WeightTransform::Log] {
            let w = t.weight(0.0, 2.0);
            assert!(w.is_finite() && w > 0.0, "{:?} gave {}", t, w);
            assert!(w >= t.weight(1.0, 2.0));
        }
        assert_relative_eq!(WeightTransform::Level.weight(0.0, 2.0), 1e20, max_relative = 1e-9);
        // Huge exponent saturates instead of overflowing
        assert_eq!(WeightTransform::Level.weight(0.0, 100.0), f64::MAX);
    }

    #[test]
    fn test_relative_weight() {
        for t in [WeightTransform::Level, WeightTransform::Log] {
            assert_eq!(t.relative_weight(500.0, 500.0, 80.0), 1.0);
            let r = t.relative_weight(2000.0, 1000.0, 2.0);
            assert_relative_eq!(r, t.weight(2000.0, 2.0) / t.weight(1000.0, 2.0), max_relative = 1e-12);
            let r = t.relative_weight(1.1e7, 1e7, 60.0);
            assert!(r > 0.0 && r < 1.0, "{:?} gave {}", t, r);
        }
        assert_relative_eq!(WeightTransform::Level.relative_weight(20.0, 10.0, 1.0), 0.5, epsilon = 1e-15);
        // Absolute level weights underflow to 0 at this range
        assert_eq!(WeightTransform::Level.weight(1e7, 60.0), 0.0);
    }

    #[test]
    fn test_nan_distance() {
        assert!(WeightTransform::Level.weight(f64::NAN, 2.0).is_nan());
    }

    #[test]
    fn test_invalid_decay() {
        for decay in [-1.0, f64::NAN, f64::INFINITY] {
            let err = inverse_value(&[1.0], decay, WeightTransform::Level).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_transform_names() {
        assert_eq!("level".parse::<WeightTransform>().unwrap(), WeightTransform::Level);
        assert_eq!("log".parse::<WeightTransform>().unwrap(), WeightTransform::Log);
        assert!("Level".parse::<WeightTransform>().unwrap_err().is_invalid_argument());
        assert!(inverse_value_by_name(&[1.0], 2.0, "sqrt").unwrap_err().is_invalid_argument());
        assert_eq!(inverse_value_by_name(&[2.0], 1.0, "level").unwrap(), vec![0.5]);
    }
}
