use crate::core::estimator::ExtremumEstimator;
use crate::core::filter::SampleFilter;
use crate::core::grid::{CalibrationGrid, RowBand};
use crate::io::stack::TimeSeriesStack;
use crate::types::{CalResult, Channel};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use crate::types::CalError;

/// Grid scheduling parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SchedulerParams {
    /// Fixed worker pool size
    pub num_workers: usize,
    /// Whether the final grid column is calibrated. The historical products
    /// left it at its zeroed default, so that remains the default here.
    pub process_last_column: bool,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            num_workers: 24,
            process_last_column: false,
        }
    }
}

/// Partition grid rows across a fixed number of workers.
///
/// Every non-final worker receives `rows / workers` contiguous rows; the
/// final worker absorbs whatever remains, so the ranges always cover
/// `0..rows` exactly with no overlap.
pub fn partition_rows(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_worker = rows / workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for worker in 0..workers {
        let stop = if worker == workers - 1 {
            rows
        } else {
            (start + per_worker).min(rows)
        };
        ranges.push(start..stop);
        start = stop;
    }
    ranges
}

/// Applies the estimator across a whole grid with a fixed worker pool.
///
/// Rows are partitioned up front and each worker owns a disjoint band of the
/// output grid, so no coordination happens after the split. Per-pixel results
/// depend only on that pixel's series; the grid contents are identical for
/// any worker count. A panicking worker aborts the whole run; no partial
/// grid is returned.
#[derive(Debug, Clone, Default)]
pub struct GridScheduler {
    params: SchedulerParams,
    filter: SampleFilter,
    estimator: ExtremumEstimator,
}

impl GridScheduler {
    /// Create a scheduler with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler with custom parameters
    pub fn with_params(params: SchedulerParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Create a scheduler with custom processing stages
    pub fn with_stages(
        params: SchedulerParams,
        filter: SampleFilter,
        estimator: ExtremumEstimator,
    ) -> Self {
        Self {
            params,
            filter,
            estimator,
        }
    }

    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Calibrate every pixel of the grid for one channel.
    pub fn run(&self, stack: &TimeSeriesStack, channel: Channel) -> CalResult<CalibrationGrid> {
        let rows = stack.rows();
        let columns = stack.columns();
        let column_limit = if self.params.process_last_column {
            columns
        } else {
            columns.saturating_sub(1)
        };

        let mut grid = CalibrationGrid::new(rows, columns)?;
        let ranges = partition_rows(rows, self.params.num_workers);

        log::info!(
            "starting calibration run: {}x{} grid, channel {}, {} workers",
            rows,
            columns,
            channel,
            ranges.len()
        );

        let progress = AtomicUsize::new(0);

        #[cfg(feature = "parallel")]
        {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(ranges.len())
                .build()
                .map_err(|e| CalError::Worker(format!("failed to build worker pool: {}", e)))?;

            let bands = grid.row_bands(&ranges);
            pool.scope(|scope| {
                for mut band in bands {
                    let progress = &progress;
                    scope.spawn(move |_| {
                        self.process_band(stack, channel, &mut band, column_limit, progress, rows);
                    });
                }
            });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for mut band in grid.row_bands(&ranges) {
                self.process_band(stack, channel, &mut band, column_limit, &progress, rows);
            }
        }

        log::info!(
            "calibration run complete: {} rows processed",
            progress.load(Ordering::Relaxed)
        );
        Ok(grid)
    }

    fn process_band(
        &self,
        stack: &TimeSeriesStack,
        channel: Channel,
        band: &mut RowBand<'_>,
        column_limit: usize,
        progress: &AtomicUsize,
        total_rows: usize,
    ) {
        for row in band.rows() {
            let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("processing row {} ({}/{})", row, done, total_rows);

            for column in 0..column_limit {
                let series = stack.pixel(row, column);
                let samples = self.filter.filter_series(&series, channel);
                let result = self.estimator.estimate(&samples);
                band.set(row, column, result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(rows: usize, workers: usize) {
        let ranges = partition_rows(rows, workers);
        assert_eq!(ranges.len(), workers.max(1));

        let mut next = 0;
        for range in &ranges {
            assert_eq!(range.start, next, "gap or overlap at row {}", next);
            next = range.end;
        }
        assert_eq!(next, rows, "partition must end at the last row");
    }

    #[test]
    fn test_partition_covers_all_rows() {
        for (rows, workers) in [
            (10, 3),
            (100, 24),
            (7, 7),
            (5, 1),
            (1, 1),
            (24, 24),
            (1000, 24),
            (1150, 24),
        ] {
            assert_exact_cover(rows, workers);
        }
    }

    #[test]
    fn test_partition_non_final_share() {
        let ranges = partition_rows(100, 24);
        for range in &ranges[..23] {
            assert_eq!(range.end - range.start, 100 / 24);
        }
        // Final worker absorbs the remainder.
        assert_eq!(ranges[23], 92..100);
    }

    #[test]
    fn test_partition_more_workers_than_rows() {
        // Degenerate split: non-final workers end up empty, coverage holds.
        assert_exact_cover(3, 5);
        let ranges = partition_rows(3, 5);
        assert!(ranges[..4].iter().all(|r| r.is_empty()));
        assert_eq!(ranges[4], 0..3);
    }

    #[test]
    fn test_partition_zero_workers_clamped() {
        assert_exact_cover(4, 0);
    }
}
