//! Wire discriminators, one closed set per verb.

use crate::prelude::{CacheError, CacheResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Replace,
    Delete,
    Upsert,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Read => "read",
            Operation::Replace => "replace",
            Operation::Delete => "delete",
            Operation::Upsert => "upsert",
        };
        f.write_str(name)
    }
}

/// Treats an empty string the same as an absent field.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    Rois,
    Settings,
    Histograms,
    ZoomRanges,
    All,
}

impl ReadTarget {
    /// Absent `type` reads the ROI collection.
    pub fn from_wire(kind: Option<&str>) -> CacheResult<Self> {
        present(kind).map_or(Ok(ReadTarget::Rois), |kind| kind.parse())
    }
}

impl FromStr for ReadTarget {
    type Err = CacheError;

    fn from_str(kind: &str) -> CacheResult<Self> {
        match kind {
            "rois" => Ok(ReadTarget::Rois),
            "settings" => Ok(ReadTarget::Settings),
            "histograms" => Ok(ReadTarget::Histograms),
            "zoom-ranges" => Ok(ReadTarget::ZoomRanges),
            "all" => Ok(ReadTarget::All),
            other => Err(CacheError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceTarget {
    Rois,
    Settings,
    Histograms,
    ZoomRanges,
    All,
}

impl ReplaceTarget {
    pub fn from_wire(kind: Option<&str>) -> CacheResult<Self> {
        present(kind)
            .ok_or(CacheError::MissingParameter("type"))?
            .parse()
    }
}

impl FromStr for ReplaceTarget {
    type Err = CacheError;

    fn from_str(kind: &str) -> CacheResult<Self> {
        match kind {
            "rois" => Ok(ReplaceTarget::Rois),
            "settings" => Ok(ReplaceTarget::Settings),
            "histograms" => Ok(ReplaceTarget::Histograms),
            "zoom-ranges" => Ok(ReplaceTarget::ZoomRanges),
            "all" => Ok(ReplaceTarget::All),
            other => Err(CacheError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Rois,
    Settings,
    Histograms,
    ZoomRanges,
    /// Drops one histogram's view state (zoom range and ROIs), keeping its
    /// configuration entry.
    Histogram(String),
    All,
}

impl DeleteTarget {
    /// Absent `type` resets everything.
    pub fn from_wire(kind: Option<&str>, id: Option<&str>) -> CacheResult<Self> {
        match present(kind).unwrap_or("all") {
            "rois" => Ok(DeleteTarget::Rois),
            "settings" => Ok(DeleteTarget::Settings),
            "histograms" => Ok(DeleteTarget::Histograms),
            "zoom-ranges" => Ok(DeleteTarget::ZoomRanges),
            "histogram" => present(id)
                .map(|id| DeleteTarget::Histogram(id.to_string()))
                .ok_or(CacheError::MissingParameter("id")),
            "all" => Ok(DeleteTarget::All),
            other => Err(CacheError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertTarget {
    Roi,
    Histogram,
    ZoomRange,
}

impl UpsertTarget {
    pub fn from_wire(kind: Option<&str>) -> CacheResult<Self> {
        present(kind)
            .ok_or(CacheError::MissingParameter("type"))?
            .parse()
    }
}

impl FromStr for UpsertTarget {
    type Err = CacheError;

    fn from_str(kind: &str) -> CacheResult<Self> {
        match kind {
            "roi" => Ok(UpsertTarget::Roi),
            "histogram" => Ok(UpsertTarget::Histogram),
            "zoom-range" => Ok(UpsertTarget::ZoomRange),
            other => Err(CacheError::InvalidType(other.to_string())),
        }
    }
}
