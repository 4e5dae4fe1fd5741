use crate::core::filter::FilteredSample;
use std::cmp::Ordering;

/// Extremum estimator parameters
#[derive(Debug, Clone, Copy)]
pub struct EstimatorParams {
    /// IQR multiplier for the coarse rejection pass
    pub coarse_multiplier: f32,
    /// IQR multiplier for the fine rejection pass
    pub fine_multiplier: f64,
    /// Fraction of the surviving samples averaged into each extremum
    pub tail_fraction: f64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            coarse_multiplier: 3.0,
            fine_multiplier: 1.5,
            tail_fraction: 0.05,
        }
    }
}

/// Calibrated reference levels for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationResult {
    /// Dry reference at the reference incidence angle
    pub dry: f32,
    /// Wet reference at the measurement incidence angle
    pub wet: f32,
    /// Mean slope over the dry tail
    pub dry_slope: f32,
}

impl CalibrationResult {
    /// Sentinel result for pixels with no usable observations.
    pub const ZERO: CalibrationResult = CalibrationResult {
        dry: 0.0,
        wet: 0.0,
        dry_slope: 0.0,
    };

    pub fn is_degenerate(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Index range into a sorted ordering, inclusive on both ends.
#[derive(Debug, Clone, Copy)]
struct Band {
    start: usize,
    stop: usize,
}

/// Two ascending orderings over one underlying sample buffer.
///
/// Index-array sorts keep the raw-value and adjusted-dry orderings in sync
/// with the same samples instead of duplicating them.
struct OrderedSamples<'a> {
    samples: &'a [FilteredSample],
    wet_order: Vec<usize>,
    dry_order: Vec<usize>,
}

impl<'a> OrderedSamples<'a> {
    fn new(samples: &'a [FilteredSample]) -> Self {
        let mut wet_order: Vec<usize> = (0..samples.len()).collect();
        wet_order.sort_by(|&a, &b| {
            samples[a]
                .value
                .partial_cmp(&samples[b].value)
                .unwrap_or(Ordering::Equal)
        });

        let mut dry_order: Vec<usize> = (0..samples.len()).collect();
        dry_order.sort_by(|&a, &b| {
            samples[a]
                .adjusted_dry
                .partial_cmp(&samples[b].adjusted_dry)
                .unwrap_or(Ordering::Equal)
        });

        Self {
            samples,
            wet_order,
            dry_order,
        }
    }

    fn wet_value(&self, rank: usize) -> f32 {
        self.samples[self.wet_order[rank]].value
    }

    fn dry_value(&self, rank: usize) -> f32 {
        self.samples[self.dry_order[rank]].adjusted_dry
    }

    fn dry_slope(&self, rank: usize) -> f32 {
        self.samples[self.dry_order[rank]].slope
    }
}

/// Outlier-robust dry/wet extremum estimator.
///
/// Two rounds of IQR-based trimming suppress residual outliers, then each
/// extremum is taken as the mean of a small surviving tail rather than a
/// single min/max. The quartile and tail index arithmetic, truncating
/// divisions included, is part of the product definition: retrievals
/// calibrated against existing reference grids depend on it bit for bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtremumEstimator {
    params: EstimatorParams,
}

impl ExtremumEstimator {
    /// Create an estimator with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with custom parameters
    pub fn with_params(params: EstimatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Estimate `(dry, wet, dry_slope)` from one pixel's filtered samples.
    pub fn estimate(&self, samples: &[FilteredSample]) -> CalibrationResult {
        let n = samples.len();
        if n == 0 {
            return CalibrationResult::ZERO;
        }

        let ordered = OrderedSamples::new(samples);
        let wet_key = |rank: usize| ordered.wet_value(rank);
        let dry_key = |rank: usize| ordered.dry_value(rank);

        let wet_band = self.coarse_trim(&wet_key, n);
        let dry_band = self.coarse_trim(&dry_key, n);

        let wet_band = self.fine_trim(&wet_key, n, wet_band);
        let dry_band = self.fine_trim(&dry_key, n, dry_band);

        // Average the extreme tail that survived both trims. Sparse pixels can
        // truncate the tail to zero samples; keep at least one.
        let num_dry = self.tail_count(n - dry_band.start);
        let num_wet = self.tail_count(wet_band.stop);

        let dry = range_mean(&dry_key, dry_band.start, dry_band.start + num_dry - 1);
        let dry_slope = range_mean(
            &|rank| ordered.dry_slope(rank),
            dry_band.start,
            dry_band.start + num_dry - 1,
        );
        let wet = range_mean(&wet_key, wet_band.stop + 1 - num_wet, wet_band.stop);

        CalibrationResult {
            dry,
            wet,
            dry_slope,
        }
    }

    /// Coarse rejection over the full ordering.
    fn coarse_trim<F: Fn(usize) -> f32>(&self, key: &F, n: usize) -> Band {
        // q1 = (N+1)/4, q3 = 3(N+1)/4; for tiny N the upper index can land
        // past the end and is clamped.
        let q1 = ((n + 1) / 4).min(n - 1);
        let q3 = (3 * (n + 1) / 4).min(n - 1);
        let iqr = key(q3) - key(q1);
        let center = range_mean(key, 0, n - 1);
        let low = center - self.params.coarse_multiplier * iqr;
        let high = center + self.params.coarse_multiplier * iqr;
        band_scan(key, n, low, high)
    }

    /// Fine rejection: statistics from the coarse band, re-scan of the full
    /// ordering.
    fn fine_trim<F: Fn(usize) -> f32>(&self, key: &F, n: usize, band: Band) -> Band {
        let span = band.stop - band.start + 1;
        let q1 = span / 4 + band.start;
        let q3 = 3 * span / 4 + band.start;
        let iqr = key(q3) - key(q1);
        let center = range_mean(key, band.start, band.stop);
        let low = (center as f64 - self.params.fine_multiplier * iqr as f64) as f32;
        let high = (center as f64 + self.params.fine_multiplier * iqr as f64) as f32;
        band_scan(key, n, low, high)
    }

    fn tail_count(&self, surviving: usize) -> usize {
        ((surviving as f64 * self.params.tail_fraction) as usize).max(1)
    }
}

/// Scan an ascending ordering for the span inside `(low, high)`.
///
/// `start` is the first in-band index and is never reset; `stop` keeps
/// extending on every later element still under the upper bound. If nothing
/// enters the band the span collapses to `[0, 0]`.
fn band_scan<F: Fn(usize) -> f32>(key: &F, n: usize, low: f32, high: f32) -> Band {
    let mut band = Band { start: 0, stop: 0 };
    let mut found = false;
    for rank in 0..n {
        let value = key(rank);
        if !found && value > low && value < high {
            band.start = rank;
            found = true;
        }
        if found && value < high {
            band.stop = rank;
        }
    }
    band
}

/// Mean over an inclusive rank range, accumulated in f32.
fn range_mean<F: Fn(usize) -> f32>(key: &F, start: usize, stop: usize) -> f32 {
    let mut sum = 0.0f32;
    for rank in start..=stop {
        sum += key(rank);
    }
    sum / (stop - start + 1) as f32
}
