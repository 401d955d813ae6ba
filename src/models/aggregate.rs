use serde::{Deserialize, Serialize};

use crate::aggregation::readable::to_readable;
use crate::error::EngineResult;
use crate::models::ReadableDuration;

/// Total active time attributed to one value of a grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate<K> {
    pub key: K,
    /// Sum of reconstructed duration lengths, in milliseconds.
    pub total_time: i64,
}

impl<K> Aggregate<K> {
    pub fn new(key: K, total_time: i64) -> Self {
        Self { key, total_time }
    }

    pub fn readable(&self) -> EngineResult<ReadableDuration> {
        to_readable(self.total_time)
    }
}
