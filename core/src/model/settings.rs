use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Grid,
    Rows,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Auto,
    Light,
    Dark,
}

/// Global dashboard settings, a singleton document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DashboardSettings {
    pub layout: Layout,
    pub grid_cols: u32,
    pub is_log_scale: bool,
    pub sync_zoom: bool,
    pub show_labels: bool,
    #[serde(rename = "showROIs")]
    pub show_rois: bool,
    pub show_integrals: bool,
    pub auto_update: bool,
    /// Milliseconds between histogram refreshes.
    pub update_interval: u64,
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebin_factor: Option<u32>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            layout: Layout::Grid,
            grid_cols: 3,
            is_log_scale: false,
            sync_zoom: false,
            show_labels: true,
            show_rois: true,
            show_integrals: true,
            auto_update: true,
            update_interval: 2000,
            theme: Theme::Auto,
            rebin_factor: Some(1),
        }
    }
}
