use super::number::compact;
use super::Keyed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One axis region drawn on a histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roi {
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "compact")]
    pub low: f64,
    #[serde(serialize_with = "compact")]
    pub high: f64,
    #[serde(serialize_with = "compact")]
    pub integral: f64,
    pub color: String,
    pub enabled: bool,
}

impl Keyed for Roi {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Histogram id -> ROIs drawn on that histogram.
pub type RoiCollection = BTreeMap<String, Vec<Roi>>;
