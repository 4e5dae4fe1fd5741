use crate::types::{CalError, CalResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Processing region identifier.
///
/// The codes match the region naming of the upstream time-series archive
/// (`ts_<region>_<channel>` products).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Amazon basin
    Ama,
    /// Australia
    Aus,
    /// Bering / eastern Siberia
    Ber,
    /// Central America
    CAm,
    /// China / Japan
    ChJ,
    /// Europe
    Eur,
    /// Indonesia
    Ind,
    /// Northern Africa
    NAf,
    /// North America
    NAm,
    /// Southern Africa
    SAf,
    /// South America
    SAm,
    /// Southern Asia
    SAs,
}

/// Which gridded product family the region dimensions refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridKind {
    /// Full-resolution image products
    Standard,
    /// Coarse "grd" products
    Grd,
}

/// Grid dimensions for one region/product combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub rows: usize,
    pub columns: usize,
}

impl Region {
    /// Look up the grid dimensions for this region.
    ///
    /// Not every region has a defined grid for every product family; a
    /// missing table entry is a configuration error and aborts the run
    /// before any processing starts.
    pub fn grid_dims(self, kind: GridKind) -> CalResult<GridDims> {
        let (columns, rows) = match (kind, self) {
            (GridKind::Standard, Region::Ama) => (1128, 744),
            (GridKind::Standard, Region::Ber) => (1350, 750),
            (GridKind::Standard, Region::CAm) => (1440, 700),
            (GridKind::Standard, Region::ChJ) => (1980, 950),
            (GridKind::Standard, Region::Eur) => (1530, 1040),
            (GridKind::Standard, Region::Ind) => (1800, 680),
            (GridKind::Standard, Region::NAf) => (2120, 1130),
            (GridKind::Standard, Region::NAm) => (1890, 1150),
            (GridKind::Standard, Region::SAf) => (1220, 1260),
            (GridKind::Standard, Region::SAm) => (1310, 1850),
            (GridKind::Standard, Region::SAs) => (1760, 720),
            (GridKind::Grd, Region::NAm) => (672, 410),
            _ => {
                return Err(CalError::Configuration(format!(
                    "no grid dimensions defined for region {} ({:?} product)",
                    self, kind
                )))
            }
        };
        Ok(GridDims { rows, columns })
    }
}

impl FromStr for Region {
    type Err = CalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ama" => Ok(Region::Ama),
            "Aus" => Ok(Region::Aus),
            "Ber" => Ok(Region::Ber),
            "CAm" => Ok(Region::CAm),
            "ChJ" => Ok(Region::ChJ),
            "Eur" => Ok(Region::Eur),
            "Ind" => Ok(Region::Ind),
            "NAf" => Ok(Region::NAf),
            "NAm" => Ok(Region::NAm),
            "SAf" => Ok(Region::SAf),
            "SAm" => Ok(Region::SAm),
            "SAs" => Ok(Region::SAs),
            other => Err(CalError::Configuration(format!(
                "unknown region '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Region::Ama => "Ama",
            Region::Aus => "Aus",
            Region::Ber => "Ber",
            Region::CAm => "CAm",
            Region::ChJ => "ChJ",
            Region::Eur => "Eur",
            Region::Ind => "Ind",
            Region::NAf => "NAf",
            Region::NAm => "NAm",
            Region::SAf => "SAf",
            Region::SAm => "SAm",
            Region::SAs => "SAs",
        };
        write!(f, "{}", code)
    }
}
