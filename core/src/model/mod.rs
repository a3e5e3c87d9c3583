pub mod histogram;
pub mod number;
pub mod roi;
pub mod settings;
pub mod zoom;

pub use histogram::{GridPosition, HistogramConfig, HistogramSize};
pub use roi::{Roi, RoiCollection};
pub use settings::{DashboardSettings, Layout, Theme};
pub use zoom::{HistogramViewport, ZoomRange, ZoomRangeMap, ZoomViewport};

/// Entities addressable by `id` inside an ordered list.
pub trait Keyed {
    fn id(&self) -> &str;
}
