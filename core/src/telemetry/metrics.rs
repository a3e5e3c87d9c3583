use crate::dispatch::Operation;
use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub reads: usize,
    pub replaces: usize,
    pub deletes: usize,
    pub upserts: usize,
    pub client_errors: usize,
    pub server_errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_operation(&self, operation: Operation) {
        if let Ok(mut metrics) = self.inner.lock() {
            match operation {
                Operation::Read => metrics.reads += 1,
                Operation::Replace => metrics.replaces += 1,
                Operation::Delete => metrics.deletes += 1,
                Operation::Upsert => metrics.upserts += 1,
            }
        }
    }

    pub fn record_error(&self, client_error: bool) {
        if let Ok(mut metrics) = self.inner.lock() {
            if client_error {
                metrics.client_errors += 1;
            } else {
                metrics.server_errors += 1;
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_operations_and_errors() {
        let metrics = MetricsRecorder::new();
        metrics.record_operation(Operation::Read);
        metrics.record_operation(Operation::Read);
        metrics.record_operation(Operation::Upsert);
        metrics.record_error(true);
        metrics.record_error(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.reads, 2);
        assert_eq!(snapshot.upserts, 1);
        assert_eq!(snapshot.client_errors, 1);
        assert_eq!(snapshot.server_errors, 1);
    }
}
