//! Persistent visualization state for the acquisition dashboard.
//!
//! Four JSON collections (ROIs, histogram configurations, dashboard settings
//! and zoom ranges) live under one storage root and are shared by every
//! dashboard instance watching the same run.

pub mod dispatch;
pub mod model;
pub mod prelude;
pub mod storage;
pub mod telemetry;
pub mod upsert;

pub use dispatch::CacheService;
pub use prelude::{CacheError, CacheResult, Collection};
