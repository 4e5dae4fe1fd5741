use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of years covered by the multi-year time-series archive.
pub const NUM_YEARS: usize = 6;

/// Per-year day capacity of the archive (leap-year sized).
pub const DAYS_PER_YEAR: usize = 366;

/// First year of the archive window.
pub const YEAR_START: u32 = 2009;

/// Last year of the archive window (inclusive).
pub const YEAR_END: u32 = 2014;

/// Measurement channel selector.
///
/// Channel `A` calibrates the amplitude-derived backscatter, channel `B`
/// the incidence-angle slope. The channel decides both which raw value a
/// retained sample carries and which saturation sentinel the filter rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    A,
    B,
}

impl Channel {
    /// Saturation/error sentinel magnitude in the source sensor encoding.
    pub fn sentinel(self) -> f32 {
        match self {
            Channel::A => 33.0,
            Channel::B => 3.0,
        }
    }
}

impl FromStr for Channel {
    type Err = CalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" | "A" => Ok(Channel::A),
            "b" | "B" => Ok(Channel::B),
            other => Err(CalError::Configuration(format!(
                "unknown channel '{}', expected 'a' or 'b'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::A => write!(f, "a"),
            Channel::B => write!(f, "b"),
        }
    }
}

/// Error types for calibration processing
#[derive(Debug, thiserror::Error)]
pub enum CalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data format: {0}")]
    InvalidFormat(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("allocation error: {0}")]
    Allocation(String),

    #[error("worker failure: {0}")]
    Worker(String),
}

/// Result type for calibration operations
pub type CalResult<T> = Result<T, CalError>;
