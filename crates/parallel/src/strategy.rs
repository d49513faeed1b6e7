//! Parallel processing strategies

use rayon::prelude::*;

use distweight_core::{CancellationToken, Error, Result};

use crate::batch::{RowBatch, RowBatches};

/// Processing mode for row-wise computations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing on the global Rayon pool
    #[default]
    Parallel,
    /// Parallel on a dedicated pool with the given number of threads
    ParallelWith(usize),
}

impl ProcessingMode {
    /// Compute `f(row)` for every row in `0..rows`, returning results in row order.
    ///
    /// Rows are grouped into batches of `batch_size`. Each batch checks `token`
    /// before it starts; once cancellation is observed the whole call returns
    /// [`Error::Cancelled`] and no partial output.
    pub fn map_rows<T, F>(
        &self,
        rows: usize,
        batch_size: usize,
        token: &CancellationToken,
        f: F,
    ) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        let batches: Vec<RowBatch> = RowBatches::new(rows, batch_size).collect();
        tracing::trace!(rows, batches = batches.len(), mode = ?self, "mapping rows");

        let run_batch = |batch: RowBatch| -> Result<Vec<T>> {
            token.check()?;
            Ok(batch.rows().map(&f).collect())
        };

        let results: Vec<Vec<T>> = match self {
            ProcessingMode::Sequential => batches.into_iter().map(run_batch).collect::<Result<_>>()?,
            ProcessingMode::Parallel => {
                batches.into_par_iter().map(run_batch).collect::<Result<_>>()?
            }
            ProcessingMode::ParallelWith(threads) => {
                let pool = build_pool(*threads)?;
                pool.install(|| batches.into_par_iter().map(run_batch).collect::<Result<_>>())?
            }
        };

        // A cancel that lands while the final batches are running still discards the output
        token.check()?;

        let mut out = Vec::with_capacity(rows);
        for batch in results {
            out.extend(batch);
        }
        Ok(out)
    }
}

fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| Error::Other(format!("Failed to build thread pool: {}", e)))
}

/// Get the number of available CPU cores
pub fn num_cpus() -> usize {
    rayon::current_num_threads()
}

/// Configure the global thread pool
pub fn set_num_threads(threads: usize) {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok(); // Ignore if already initialized
}
