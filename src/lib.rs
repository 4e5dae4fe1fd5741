//! scatcal: parallel dry/wet backscatter reference calibration
//!
//! This library derives, for every pixel of a geospatial grid, robust dry and
//! wet reference backscatter levels and an associated dry slope from a
//! multi-year daily time series of scatterometer measurements. Each pixel is
//! filtered for sensor artifacts, trimmed with two rounds of IQR-based
//! outlier rejection, and tail-averaged into its extremes; a fixed pool of
//! workers applies the estimator across disjoint row bands of the grid. The
//! resulting grids anchor a downstream relative soil-moisture index.

pub mod core;
pub mod io;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{CalError, CalResult, Channel};

pub use crate::core::{
    CalibrationGrid, CalibrationResult, EstimatorParams, ExtremumEstimator, FilterParams,
    FilteredSample, GridScheduler, SampleFilter, SchedulerParams,
};

pub use io::{CalibrationSink, GridDims, GridKind, PixelSeries, Region, TimeSeriesStack};
