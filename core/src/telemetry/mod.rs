pub mod log;
pub mod metrics;

pub use log::OperationLog;
pub use metrics::{MetricsRecorder, MetricsSnapshot};
