//! # distweight Core
//!
//! Core types, errors and I/O shared by the distweight crates.
//!
//! This crate provides:
//! - `Coordinate` / `CoordinateSet`: lon/lat points in decimal degrees
//! - `QueryPoints` / `ReferencePoints`: inputs of the aggregation engine
//! - `AggregationTable`: per-query-point results
//! - `CancellationToken`: cooperative cancellation for batch work
//! - CSV I/O with header-based column lookup

pub mod cancel;
pub mod coords;
pub mod error;
pub mod io;
pub mod points;
pub mod table;

pub use cancel::CancellationToken;
pub use coords::{Coordinate, CoordinateSet};
pub use error::{Error, Result};
pub use points::{QueryPoints, ReferencePoints};
pub use table::{AggregationRecord, AggregationTable, ResultKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cancel::CancellationToken;
    pub use crate::coords::{Coordinate, CoordinateSet};
    pub use crate::error::{Error, Result};
    pub use crate::points::{QueryPoints, ReferencePoints};
    pub use crate::table::{AggregationRecord, AggregationTable, ResultKind};
}
