//! Geographic coordinates and coordinate sets

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A (longitude, latitude) pair in decimal degrees.
///
/// Values are not normalized or validated; out-of-range input simply flows
/// through the distance formulas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl From<geo_types::Coord<f64>> for Coordinate {
    fn from(c: geo_types::Coord<f64>) -> Self {
        Self { lon: c.x, lat: c.y }
    }
}

impl From<geo_types::Point<f64>> for Coordinate {
    fn from(p: geo_types::Point<f64>) -> Self {
        p.0.into()
    }
}

impl From<Coordinate> for geo_types::Coord<f64> {
    fn from(c: Coordinate) -> Self {
        geo_types::Coord { x: c.lon, y: c.lat }
    }
}

/// A batch of coordinates stored as parallel longitude/latitude columns.
///
/// Index `i` of `lon` pairs with index `i` of `lat`; construction enforces
/// equal lengths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinateSet")]
pub struct CoordinateSet {
    lon: Vec<f64>,
    lat: Vec<f64>,
}

/// Unchecked serialized form; deserialization goes through [`CoordinateSet::new`].
#[derive(Deserialize)]
struct RawCoordinateSet {
    lon: Vec<f64>,
    lat: Vec<f64>,
}

impl TryFrom<RawCoordinateSet> for CoordinateSet {
    type Error = Error;

    fn try_from(raw: RawCoordinateSet) -> Result<Self> {
        Self::new(raw.lon, raw.lat)
    }
}

impl CoordinateSet {
    /// Build a set from parallel columns.
    ///
    /// Fails with [`Error::LengthMismatch`] when the columns differ in length.
    pub fn new(lon: Vec<f64>, lat: Vec<f64>) -> Result<Self> {
        Error::check_len("latitudes", lon.len(), lat.len())?;
        Ok(Self { lon, lat })
    }

    /// Build a set from borrowed columns.
    pub fn from_slices(lon: &[f64], lat: &[f64]) -> Result<Self> {
        Self::new(lon.to_vec(), lat.to_vec())
    }

    pub fn len(&self) -> usize {
        self.lon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    /// Longitude column
    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    /// Latitude column
    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    /// Coordinate at index `i`, if in range.
    pub fn get(&self, i: usize) -> Option<Coordinate> {
        Some(Coordinate::new(*self.lon.get(i)?, *self.lat.get(i)?))
    }

    /// Coordinate at index `i` without the `Option`; panics when out of range.
    #[inline]
    pub fn at(&self, i: usize) -> Coordinate {
        Coordinate::new(self.lon[i], self.lat[i])
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Coordinate> + '_ {
        self.lon
            .iter()
            .zip(&self.lat)
            .map(|(&lon, &lat)| Coordinate::new(lon, lat))
    }

    pub fn push(&mut self, c: Coordinate) {
        self.lon.push(c.lon);
        self.lat.push(c.lat);
    }
}

impl FromIterator<Coordinate> for CoordinateSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut set = CoordinateSet::default();
        for c in iter {
            set.push(c);
        }
        set
    }
}
