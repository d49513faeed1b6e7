//! Vincenty inverse formula on a reference ellipsoid
//!
//! Reference:
//! Vincenty, T. (1975). Direct and inverse solutions of geodesics on the
//! ellipsoid with application of nested equations. Survey Review, 23(176).

use distweight_core::{Coordinate, Error, Result};

use super::{deg_to_rad, haversine};

/// WGS84 ellipsoid parameters
const WGS84_A: f64 = 6_378_137.0; // semi-major axis (m)
const WGS84_F: f64 = 1.0 / 298.257_223_563; // flattening

/// Convergence threshold on successive λ values (radians)
pub const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Iteration cap; near-antipodal pairs hit it
pub const VINCENTY_MAX_ITERATIONS: usize = 200;

/// Reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters. Default: WGS84 (6378137.0)
    pub semi_major: f64,
    /// Flattening. Default: WGS84 (1/298.257223563)
    pub flattening: f64,
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major: WGS84_A,
        flattening: WGS84_F,
    };

    /// Semi-minor axis b = a(1 − f)
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.flattening)
    }
}

/// Geodesic distance in meters on WGS84, best effort.
///
/// Pairs for which the iteration does not converge (nearly antipodal points)
/// fall back to the [`haversine`] distance, so this never fails.
pub fn vincenty(a: Coordinate, b: Coordinate) -> f64 {
    match vincenty_inverse(a, b) {
        Ok(d) => d,
        Err(_) => {
            tracing::trace!(?a, ?b, "Vincenty did not converge, using haversine");
            haversine(a, b)
        }
    }
}

/// Geodesic distance in meters on WGS84.
///
/// Fails with [`Error::NoConvergence`] when λ has not settled after
/// [`VINCENTY_MAX_ITERATIONS`].
pub fn vincenty_inverse(a: Coordinate, b: Coordinate) -> Result<f64> {
    vincenty_inverse_with(a, b, &Ellipsoid::WGS84, VINCENTY_MAX_ITERATIONS)
}

/// Vincenty inverse formula with explicit ellipsoid and iteration cap.
///
/// Coordinates are lon/lat in degrees; the result is in meters.
pub fn vincenty_inverse_with(
    p1: Coordinate,
    p2: Coordinate,
    ellipsoid: &Ellipsoid,
    max_iterations: usize,
) -> Result<f64> {
    if p1 == p2 {
        return Ok(0.0);
    }

    let a = ellipsoid.semi_major;
    let f = ellipsoid.flattening;
    let b = ellipsoid.semi_minor();

    // Reduced latitudes
    let u1 = ((1.0 - f) * deg_to_rad(p1.lat).tan()).atan();
    let u2 = ((1.0 - f) * deg_to_rad(p2.lat).tan()).atan();
    let l = deg_to_rad(p2.lon - p1.lon);

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;

    for _ in 0..max_iterations {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        if sin_sigma == 0.0 {
            return Ok(0.0); // Co-incident points
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;

        // Equatorial line: cos²α = 0
        let cos_2sigma_m = if cos2_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let lambda_prev = lambda;
        lambda = l + (1.0 - c) * f * sin_alpha
            * (sigma + c * sin_sigma
                * (cos_2sigma_m + c * cos_sigma
                    * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < VINCENTY_TOLERANCE {
            let u_sq = cos2_alpha * (a * a - b * b) / (b * b);
            let big_a = 1.0 + u_sq / 16384.0
                * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0
                * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b * sin_sigma
                * (cos_2sigma_m + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0 * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

            return Ok(b * big_a * (sigma - delta_sigma));
        }
    }

    Err(Error::NoConvergence {
        iterations: max_iterations,
    })
}
