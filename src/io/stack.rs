use crate::io::regions::GridDims;
use crate::types::{CalError, CalResult, DAYS_PER_YEAR, NUM_YEARS};
use ndarray::{s, Array4, ArrayView2};

/// Multi-year daily time series for a whole grid, both channels.
///
/// Shape is `(rows, columns, years, days)` for each channel. The stack is
/// loaded once by the ingestion collaborator and shared read-only across all
/// workers; zero is the "no observation" sentinel.
#[derive(Debug, Clone)]
pub struct TimeSeriesStack {
    primary: Array4<f32>,
    slope: Array4<f32>,
}

/// Read-only view of one pixel's time series, both channels.
///
/// Each view is `(years, days)`; iterating in standard (row-major) order
/// walks the series chronologically, year by year.
#[derive(Debug, Clone, Copy)]
pub struct PixelSeries<'a> {
    pub primary: ArrayView2<'a, f32>,
    pub slope: ArrayView2<'a, f32>,
}

impl TimeSeriesStack {
    /// Wrap pre-loaded channel arrays, validating that their shapes agree.
    pub fn new(primary: Array4<f32>, slope: Array4<f32>) -> CalResult<Self> {
        if primary.dim() != slope.dim() {
            return Err(CalError::InvalidFormat(format!(
                "channel shape mismatch: primary {:?} vs slope {:?}",
                primary.dim(),
                slope.dim()
            )));
        }
        Ok(Self { primary, slope })
    }

    /// Allocate a zero-filled stack.
    ///
    /// Full-resolution stacks run to tens of gigabytes, so the requested
    /// size is checked before touching the allocator.
    pub fn zeros(rows: usize, columns: usize, years: usize, days: usize) -> CalResult<Self> {
        let elements = checked_elements(&[rows, columns, years, days])?;
        log::debug!(
            "allocating time-series stack: {}x{}x{}x{} = {} elements per channel",
            rows,
            columns,
            years,
            days,
            elements
        );
        Ok(Self {
            primary: Array4::zeros((rows, columns, years, days)),
            slope: Array4::zeros((rows, columns, years, days)),
        })
    }

    /// Allocate the standard multi-year archive window for a region grid.
    pub fn for_region(dims: GridDims) -> CalResult<Self> {
        Self::zeros(dims.rows, dims.columns, NUM_YEARS, DAYS_PER_YEAR)
    }

    pub fn rows(&self) -> usize {
        self.primary.dim().0
    }

    pub fn columns(&self) -> usize {
        self.primary.dim().1
    }

    pub fn years(&self) -> usize {
        self.primary.dim().2
    }

    pub fn days(&self) -> usize {
        self.primary.dim().3
    }

    /// Read-only view of one pixel's series, both channels.
    pub fn pixel(&self, row: usize, column: usize) -> PixelSeries<'_> {
        PixelSeries {
            primary: self.primary.slice(s![row, column, .., ..]),
            slope: self.slope.slice(s![row, column, .., ..]),
        }
    }

    /// Mutable access for the ingestion collaborator to fill the stack.
    pub fn primary_mut(&mut self) -> &mut Array4<f32> {
        &mut self.primary
    }

    pub fn slope_mut(&mut self) -> &mut Array4<f32> {
        &mut self.slope
    }
}

/// Check that an f32 buffer of the given dimensions is addressable.
pub(crate) fn checked_elements(dims: &[usize]) -> CalResult<usize> {
    let elements = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&n| n.checked_mul(std::mem::size_of::<f32>()).map_or(false, |b| b <= isize::MAX as usize))
        .ok_or_else(|| {
            CalError::Allocation(format!("array of shape {:?} exceeds addressable memory", dims))
        })?;
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_shape_mismatch_rejected() {
        let primary = Array4::<f32>::zeros((2, 3, 1, 4));
        let slope = Array4::<f32>::zeros((2, 3, 1, 5));
        assert!(TimeSeriesStack::new(primary, slope).is_err());
    }

    #[test]
    fn test_pixel_view_is_chronological() {
        let mut stack = TimeSeriesStack::zeros(1, 1, 2, 3).unwrap();
        for year in 0..2 {
            for day in 0..3 {
                stack.primary_mut()[[0, 0, year, day]] = (year * 3 + day) as f32;
            }
        }
        let series = stack.pixel(0, 0);
        let observed: Vec<f32> = series.primary.iter().copied().collect();
        assert_eq!(observed, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_allocation_guard() {
        assert!(checked_elements(&[4, 4, 6, 366]).is_ok());
        assert!(checked_elements(&[usize::MAX, 2]).is_err());
        assert!(TimeSeriesStack::zeros(usize::MAX, 2, 1, 1).is_err());
    }
}
