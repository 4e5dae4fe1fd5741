//! Core calibration modules

pub mod estimator;
pub mod filter;
pub mod grid;
pub mod scheduler;

// Re-export main types
pub use estimator::{CalibrationResult, EstimatorParams, ExtremumEstimator};
pub use filter::{FilterParams, FilteredSample, SampleFilter};
pub use grid::{CalibrationGrid, RowBand};
pub use scheduler::{partition_rows, GridScheduler, SchedulerParams};
