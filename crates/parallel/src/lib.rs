//! # distweight Parallel
//!
//! Parallel processing strategies for row-wise batch computations.
//!
//! This crate provides:
//! - Row batching with a fixed cancellation-check cadence
//! - Row-parallel processing using Rayon, on the global or a dedicated pool
//! - Sequential execution with the same interface

pub mod batch;
pub mod strategy;

pub use batch::{RowBatch, RowBatches};
pub use strategy::{num_cpus, set_num_threads, ProcessingMode};
