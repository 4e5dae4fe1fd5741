//! Persistence seam for calibration outputs.
//!
//! The calibration grid is archived in the same multi-dimensional format as
//! the input time series. The core only fixes the schema names and hands a
//! finished grid to a sink; readers and writers for the concrete file format
//! live with the archival collaborator.

use crate::core::grid::CalibrationGrid;
use crate::types::CalResult;

/// Row dimension name in the archival schema.
pub const DIM_ROW: &str = "row";

/// Column dimension name in the archival schema.
pub const DIM_COLUMN: &str = "column";

/// Variable name for the dry reference layer.
pub const VAR_DRY: &str = "dry";

/// Variable name for the wet reference layer.
pub const VAR_WET: &str = "wet";

/// Variable name for the dry slope layer.
pub const VAR_DRY_SLOPE: &str = "dry_slope";

/// Destination for a finished calibration grid.
pub trait CalibrationSink {
    /// Persist all three layers of the grid.
    fn write_calibration(&mut self, grid: &CalibrationGrid) -> CalResult<()>;
}
