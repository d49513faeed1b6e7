//! Query and reference point bundles consumed by the aggregation engine

use serde::{Deserialize, Serialize};

use crate::coords::{Coordinate, CoordinateSet};
use crate::error::{Error, Result};
use crate::table::{AggregationTable, ResultKind};

/// Locations that need an estimate, each with a caller-supplied id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQueryPoints")]
pub struct QueryPoints {
    ids: Vec<String>,
    coords: CoordinateSet,
}

#[derive(Deserialize)]
struct RawQueryPoints {
    ids: Vec<String>,
    coords: CoordinateSet,
}

impl TryFrom<RawQueryPoints> for QueryPoints {
    type Error = Error;

    fn try_from(raw: RawQueryPoints) -> Result<Self> {
        Self::new(raw.ids, raw.coords)
    }
}

impl QueryPoints {
    /// Fails with [`Error::LengthMismatch`] unless there is one id per coordinate.
    pub fn new(ids: Vec<String>, coords: CoordinateSet) -> Result<Self> {
        Error::check_len("query ids", coords.len(), ids.len())?;
        Ok(Self { ids, coords })
    }

    /// Query points whose ids are their 1-based row numbers.
    pub fn numbered(coords: CoordinateSet) -> Self {
        let ids = (1..=coords.len()).map(|i| i.to_string()).collect();
        Self { ids, coords }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn coords(&self) -> &CoordinateSet {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Attach one computed value per query point, keeping input order.
    ///
    /// Fails with [`Error::LengthMismatch`] unless there is one value per point.
    pub fn to_table(&self, kind: ResultKind, values: Vec<f64>) -> Result<AggregationTable> {
        AggregationTable::from_parts(kind, &self.ids, values)
    }
}

/// Locations where a quantity was measured.
///
/// Measures are required for weighted means and population for the
/// population-weighted variant; the minimum-distance reduction needs neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReferencePoints")]
pub struct ReferencePoints {
    coords: CoordinateSet,
    measures: Option<Vec<f64>>,
    population: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawReferencePoints {
    coords: CoordinateSet,
    #[serde(default)]
    measures: Option<Vec<f64>>,
    #[serde(default)]
    population: Option<Vec<f64>>,
}

impl TryFrom<RawReferencePoints> for ReferencePoints {
    type Error = Error;

    fn try_from(raw: RawReferencePoints) -> Result<Self> {
        let mut points = Self::new(raw.coords);
        if let Some(measures) = raw.measures {
            points = points.with_measures(measures)?;
        }
        if let Some(population) = raw.population {
            points = points.with_population(population)?;
        }
        Ok(points)
    }
}

impl ReferencePoints {
    pub fn new(coords: CoordinateSet) -> Self {
        Self {
            coords,
            measures: None,
            population: None,
        }
    }

    /// Attach one measure per reference coordinate.
    pub fn with_measures(mut self, measures: Vec<f64>) -> Result<Self> {
        Error::check_len("measures", self.coords.len(), measures.len())?;
        self.measures = Some(measures);
        Ok(self)
    }

    /// Attach one population value per reference coordinate.
    pub fn with_population(mut self, population: Vec<f64>) -> Result<Self> {
        Error::check_len("population", self.coords.len(), population.len())?;
        self.population = Some(population);
        Ok(self)
    }

    pub fn coords(&self) -> &CoordinateSet {
        &self.coords
    }

    pub fn measures(&self) -> Option<&[f64]> {
        self.measures.as_deref()
    }

    pub fn population(&self) -> Option<&[f64]> {
        self.population.as_deref()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

impl From<CoordinateSet> for ReferencePoints {
    fn from(coords: CoordinateSet) -> Self {
        Self::new(coords)
    }
}

impl FromIterator<(Coordinate, f64)> for ReferencePoints {
    /// Collect (coordinate, measure) pairs into a measured reference set.
    fn from_iter<I: IntoIterator<Item = (Coordinate, f64)>>(iter: I) -> Self {
        let mut coords = CoordinateSet::default();
        let mut measures = Vec::new();
        for (c, m) in iter {
            coords.push(c);
            measures.push(m);
        }
        Self {
            coords,
            measures: Some(measures),
            population: None,
        }
    }
}
