use crate::dispatch::Operation;
use crate::prelude::CacheError;
use log::{error, info, warn};

pub struct OperationLog;

impl OperationLog {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, operation: Operation, target: &str) {
        info!("{} {}", operation, target);
    }

    pub fn failure(&self, operation: Operation, err: &CacheError) {
        if err.is_client_error() {
            warn!("{} rejected: {}", operation, err);
        } else {
            error!("{} failed: {}", operation, err);
        }
    }

    pub fn note(&self, message: &str) {
        warn!("{}", message);
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new()
    }
}
