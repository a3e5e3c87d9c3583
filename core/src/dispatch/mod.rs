pub mod request;
pub mod service;
pub mod target;

pub use request::{
    AggregatePatch, CacheDocument, CacheSnapshot, DeleteRequest, ReadRequest, ReplaceRequest,
    UpsertRequest, UpsertedEntry,
};
pub use service::CacheService;
pub use target::{DeleteTarget, Operation, ReadTarget, ReplaceTarget, UpsertTarget};
