//! Row batching for cancellable batch work

use std::ops::Range;

/// A contiguous run of rows processed by one worker between cancellation checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBatch {
    /// Position of this batch in the sequence
    pub index: usize,
    /// First row (inclusive)
    pub start: usize,
    /// Last row (exclusive)
    pub end: usize,
}

impl RowBatch {
    /// Number of rows in this batch
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Iterator over fixed-size row batches covering `0..total_rows`
#[derive(Debug, Clone)]
pub struct RowBatches {
    total_rows: usize,
    batch_size: usize,
    next_start: usize,
    index: usize,
}

impl RowBatches {
    /// A `batch_size` of 0 is treated as 1.
    pub fn new(total_rows: usize, batch_size: usize) -> Self {
        Self {
            total_rows,
            batch_size: batch_size.max(1),
            next_start: 0,
            index: 0,
        }
    }

    /// Number of batches the iterator yields in total
    pub fn count_batches(&self) -> usize {
        self.total_rows.div_ceil(self.batch_size)
    }
}

impl Iterator for RowBatches {
    type Item = RowBatch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start >= self.total_rows {
            return None;
        }

        let start = self.next_start;
        let end = (start + self.batch_size).min(self.total_rows);
        let batch = RowBatch {
            index: self.index,
            start,
            end,
        };

        self.next_start = end;
        self.index += 1;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_rows.saturating_sub(self.next_start).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowBatches {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_cover_all_rows() {
        let rows = 1003;
        let mut covered = vec![false; rows];

        for batch in RowBatches::new(rows, 100) {
            for r in batch.rows() {
                assert!(!covered[r], "Row {} covered twice", r);
                covered[r] = true;
            }
        }

        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn test_last_batch_is_short() {
        let batches: Vec<_> = RowBatches::new(250, 100).collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2], RowBatch { index: 2, start: 200, end: 250 });
        assert_eq!(batches[2].len(), 50);
        assert_eq!(RowBatches::new(250, 100).count_batches(), 3);
    }

    #[test]
    fn test_empty_and_zero_size() {
        assert_eq!(RowBatches::new(0, 100).count(), 0);
        // Zero batch size degrades to one row per batch
        assert_eq!(RowBatches::new(5, 0).count(), 5);
    }
}
