use crate::io::stack::PixelSeries;
use crate::types::Channel;

/// Sample filtering parameters
#[derive(Debug, Clone, Copy)]
pub struct FilterParams {
    /// Tolerance around the per-channel saturation sentinel
    pub sentinel_epsilon: f32,
    /// Incidence-angle correction factor applied via the slope channel
    /// (25 deg reference minus the 40 deg measurement angle)
    pub adjust_offset: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            sentinel_epsilon: 0.01,
            adjust_offset: -15.0,
        }
    }
}

/// One daily observation that survived filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilteredSample {
    /// Raw channel value (backscatter for channel a, slope for channel b)
    pub value: f32,
    /// Slope channel value for the same day
    pub slope: f32,
    /// Value projected to the reference incidence angle
    pub adjusted_dry: f32,
}

impl FilteredSample {
    pub fn new(value: f32, slope: f32, adjust_offset: f32) -> Self {
        Self {
            value,
            slope,
            adjusted_dry: value + slope * adjust_offset,
        }
    }
}

/// Per-pixel observation filter.
///
/// Drops days with no observation (zero sentinel) and days whose value sits
/// on the channel's saturation sentinel. Pure transform; the output keeps
/// day order and may be empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleFilter {
    params: FilterParams,
}

impl SampleFilter {
    /// Create a filter with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter with custom parameters
    pub fn with_params(params: FilterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Filter one pixel's time series for the given channel.
    pub fn filter_series(&self, series: &PixelSeries<'_>, channel: Channel) -> Vec<FilteredSample> {
        let sentinel = channel.sentinel();
        let mut samples = Vec::new();

        for (&value, &slope) in series.primary.iter().zip(series.slope.iter()) {
            let retained = match channel {
                Channel::A => value != 0.0 && !self.is_sentinel(value, sentinel),
                Channel::B => slope != 0.0 && !self.is_sentinel(slope, sentinel),
            };
            if !retained {
                continue;
            }
            let sample_value = match channel {
                Channel::A => value,
                Channel::B => slope,
            };
            samples.push(FilteredSample::new(
                sample_value,
                slope,
                self.params.adjust_offset,
            ));
        }

        samples
    }

    fn is_sentinel(&self, value: f32, sentinel: f32) -> bool {
        (value.abs() - sentinel).abs() <= self.params.sentinel_epsilon
    }
}
