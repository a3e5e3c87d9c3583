use crate::model::{
    DashboardSettings, HistogramConfig, Roi, RoiCollection, ZoomRange, ZoomRangeMap,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplaceRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub histogram_id: Option<String>,
    pub roi_id: Option<String>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
}

impl DeleteRequest {
    /// Fields set in `self` win over those in `fallback`.
    pub fn or(self, fallback: DeleteRequest) -> DeleteRequest {
        DeleteRequest {
            kind: self.kind.or(fallback.kind),
            id: self.id.or(fallback.id),
        }
    }
}

/// All four collections in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub rois: RoiCollection,
    pub settings: DashboardSettings,
    pub histograms: Vec<HistogramConfig>,
    pub zoom_ranges: ZoomRangeMap,
}

/// Payload of an aggregate replace; absent members are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AggregatePatch {
    pub rois: Option<RoiCollection>,
    pub settings: Option<DashboardSettings>,
    pub histograms: Option<Vec<HistogramConfig>>,
    pub zoom_ranges: Option<ZoomRangeMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CacheDocument {
    Rois(RoiCollection),
    Settings(DashboardSettings),
    Histograms(Vec<HistogramConfig>),
    ZoomRanges(ZoomRangeMap),
    All(CacheSnapshot),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpsertedEntry {
    Roi(Roi),
    Histogram(HistogramConfig),
    ZoomRange(ZoomRange),
}
