use super::{HistogramViewport, Keyed, Roi};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridPosition {
    pub row: u32,
    pub col: u32,
}

/// Display configuration for one histogram tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistogramConfig {
    pub id: String,
    pub board_id: String,
    pub channel: u32,
    pub visible: bool,
    pub size: HistogramSize,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    pub position: GridPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_range: Option<HistogramViewport>,
    /// Legacy copy of this histogram's ROIs. The ROI collection is written
    /// independently and the two are never reconciled here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rois: Option<Vec<Roi>>,
}

impl Keyed for HistogramConfig {
    fn id(&self) -> &str {
        &self.id
    }
}
