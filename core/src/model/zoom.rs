use super::number::compact;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Axis viewport as written by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoomViewport {
    #[serde(serialize_with = "compact")]
    pub xmin: f64,
    #[serde(serialize_with = "compact")]
    pub xmax: f64,
    #[serde(serialize_with = "compact")]
    pub ymin: f64,
    #[serde(serialize_with = "compact")]
    pub ymax: f64,
    // Clients echo back the stamp they last read; it is never trusted.
    #[serde(default, rename = "timestamp", skip_serializing)]
    client_timestamp: Option<serde_json::Value>,
}

impl ZoomViewport {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            client_timestamp: None,
        }
    }
}

/// Viewport stored inside a histogram configuration, kept exactly as sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistogramViewport {
    #[serde(serialize_with = "compact")]
    pub xmin: f64,
    #[serde(serialize_with = "compact")]
    pub xmax: f64,
    #[serde(serialize_with = "compact")]
    pub ymin: f64,
    #[serde(serialize_with = "compact")]
    pub ymax: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Persisted viewport with its server-side write time (epoch millis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoomRange {
    #[serde(serialize_with = "compact")]
    pub xmin: f64,
    #[serde(serialize_with = "compact")]
    pub xmax: f64,
    #[serde(serialize_with = "compact")]
    pub ymin: f64,
    #[serde(serialize_with = "compact")]
    pub ymax: f64,
    pub timestamp: i64,
}

impl ZoomRange {
    pub fn stamped(viewport: &ZoomViewport, timestamp: i64) -> Self {
        Self {
            xmin: viewport.xmin,
            xmax: viewport.xmax,
            ymin: viewport.ymin,
            ymax: viewport.ymax,
            timestamp,
        }
    }
}

/// Histogram id -> last written viewport.
pub type ZoomRangeMap = BTreeMap<String, ZoomRange>;
