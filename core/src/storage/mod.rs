//! Durable JSON files backing the cache.
//!
//! Every request goes back to disk; the files are the single source of truth.
//! Each collection is guarded by its own lock so read-modify-write sequences on
//! one file are serialized while the other files stay independent.

pub mod collection;
pub mod root;
pub mod store;

pub use collection::{Histograms, Rois, Settings, ZoomRanges};
pub use root::StorageRoot;
pub use store::CollectionStore;
