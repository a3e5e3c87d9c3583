use crate::model::{DashboardSettings, HistogramConfig, RoiCollection, ZoomRangeMap};
use crate::prelude::Collection;

pub struct Rois;
pub struct Settings;
pub struct Histograms;
pub struct ZoomRanges;

impl Collection for Rois {
    type Document = RoiCollection;
    const FILE_NAME: &'static str = "rois.json";

    fn default_document() -> Self::Document {
        RoiCollection::new()
    }
}

impl Collection for Settings {
    type Document = DashboardSettings;
    const FILE_NAME: &'static str = "settings.json";

    fn default_document() -> Self::Document {
        DashboardSettings::default()
    }
}

impl Collection for Histograms {
    type Document = Vec<HistogramConfig>;
    const FILE_NAME: &'static str = "histograms.json";

    fn default_document() -> Self::Document {
        Vec::new()
    }
}

impl Collection for ZoomRanges {
    type Document = ZoomRangeMap;
    const FILE_NAME: &'static str = "zoom-ranges.json";

    fn default_document() -> Self::Document {
        ZoomRangeMap::new()
    }
}
