//! Input/output collaborators: region configuration, the time-series stack,
//! and the archival persistence seam.

pub mod archive;
pub mod regions;
pub mod stack;

// Re-export main types
pub use archive::CalibrationSink;
pub use regions::{GridDims, GridKind, Region};
pub use stack::{PixelSeries, TimeSeriesStack};
