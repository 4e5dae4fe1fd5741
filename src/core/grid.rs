use crate::core::estimator::CalibrationResult;
use crate::io::stack::checked_elements;
use crate::types::CalResult;
use ndarray::{Array2, ArrayViewMut2, Axis};
use std::ops::Range;

/// Output grid of per-pixel calibration results.
///
/// Three dense `rows x columns` layers (dry, wet, dry slope), pre-allocated
/// once and written through disjoint [`RowBand`] views during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationGrid {
    dry: Array2<f32>,
    wet: Array2<f32>,
    dry_slope: Array2<f32>,
}

/// Exclusive write access to a contiguous row range of the grid.
///
/// Bands over distinct row ranges never alias, so workers write without any
/// locking. A band only ever exposes its own rows; out-of-range writes are a
/// programming error and panic.
#[derive(Debug)]
pub struct RowBand<'a> {
    rows: Range<usize>,
    dry: ArrayViewMut2<'a, f32>,
    wet: ArrayViewMut2<'a, f32>,
    dry_slope: ArrayViewMut2<'a, f32>,
}

impl CalibrationGrid {
    /// Allocate a zero-filled grid, guarding the requested size first.
    pub fn new(rows: usize, columns: usize) -> CalResult<Self> {
        checked_elements(&[rows, columns])?;
        Ok(Self {
            dry: Array2::zeros((rows, columns)),
            wet: Array2::zeros((rows, columns)),
            dry_slope: Array2::zeros((rows, columns)),
        })
    }

    pub fn rows(&self) -> usize {
        self.dry.nrows()
    }

    pub fn columns(&self) -> usize {
        self.dry.ncols()
    }

    /// Read one pixel's result.
    pub fn get(&self, row: usize, column: usize) -> CalibrationResult {
        CalibrationResult {
            dry: self.dry[[row, column]],
            wet: self.wet[[row, column]],
            dry_slope: self.dry_slope[[row, column]],
        }
    }

    pub fn dry(&self) -> &Array2<f32> {
        &self.dry
    }

    pub fn wet(&self) -> &Array2<f32> {
        &self.wet
    }

    pub fn dry_slope(&self) -> &Array2<f32> {
        &self.dry_slope
    }

    /// Consume the grid into its `(dry, wet, dry_slope)` layers.
    pub fn into_layers(self) -> (Array2<f32>, Array2<f32>, Array2<f32>) {
        (self.dry, self.wet, self.dry_slope)
    }

    /// Split the grid into disjoint mutable bands, one per row range.
    ///
    /// The ranges must be ascending and contiguous from row 0 to the last
    /// row, the shape the scheduler's partition produces.
    pub fn row_bands<'a>(&'a mut self, ranges: &[Range<usize>]) -> Vec<RowBand<'a>> {
        let mut bands = Vec::with_capacity(ranges.len());
        let mut offset = 0;

        let mut dry_rest = self.dry.view_mut();
        let mut wet_rest = self.wet.view_mut();
        let mut slope_rest = self.dry_slope.view_mut();

        for range in ranges {
            assert_eq!(range.start, offset, "row ranges must be contiguous");
            let len = range.end - range.start;

            let (dry, dry_tail) = dry_rest.split_at(Axis(0), len);
            let (wet, wet_tail) = wet_rest.split_at(Axis(0), len);
            let (dry_slope, slope_tail) = slope_rest.split_at(Axis(0), len);

            bands.push(RowBand {
                rows: range.clone(),
                dry,
                wet,
                dry_slope,
            });

            dry_rest = dry_tail;
            wet_rest = wet_tail;
            slope_rest = slope_tail;
            offset = range.end;
        }

        bands
    }
}

impl<'a> RowBand<'a> {
    /// Grid rows this band owns.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Write one pixel's result, addressed by grid row.
    pub fn set(&mut self, row: usize, column: usize, result: CalibrationResult) {
        assert!(
            self.rows.contains(&row),
            "row {} outside band {:?}",
            row,
            self.rows
        );
        let local = row - self.rows.start;
        self.dry[[local, column]] = result.dry;
        self.wet[[local, column]] = result.wet;
        self.dry_slope[[local, column]] = result.dry_slope;
    }
}
