//! Heartbeat storage seam.
//!
//! The engine only ever reads a snapshot of heartbeats. [`HeartbeatStore`]
//! is the boundary a storage collaborator implements, and
//! [`MemoryHeartbeatStore`] is the in-process implementation. The CLI reads
//! exported batches straight from disk with [`load_heartbeats`].

use std::{
    fs,
    path::Path,
    sync::{PoisonError, RwLock},
};

use anyhow::{Context, Result};

use crate::aggregation::filter_heartbeats;
use crate::models::Heartbeat;
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

pub trait HeartbeatStore {
    /// Snapshot of every stored heartbeat, in insertion order.
    fn heartbeats(&self) -> Result<Vec<Heartbeat>>;

    fn store(&self, heartbeat: Heartbeat) -> Result<()>;

    /// Snapshot filtered with the engine's `(heartbeat, index, all)` predicate shape.
    fn heartbeats_matching<P>(&self, predicate: P) -> Result<Vec<Heartbeat>>
    where
        P: FnMut(&Heartbeat, usize, &[Heartbeat]) -> bool,
        Self: Sized,
    {
        let all = self.heartbeats()?;
        Ok(filter_heartbeats(&all, predicate))
    }
}

#[derive(Debug, Default)]
pub struct MemoryHeartbeatStore {
    data: RwLock<Vec<Heartbeat>>,
}

impl MemoryHeartbeatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heartbeats(heartbeats: Vec<Heartbeat>) -> Self {
        Self {
            data: RwLock::new(heartbeats),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HeartbeatStore for MemoryHeartbeatStore {
    fn heartbeats(&self) -> Result<Vec<Heartbeat>> {
        Ok(self
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, heartbeat: Heartbeat) -> Result<()> {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(heartbeat);
        Ok(())
    }
}

/// Read a JSON array of heartbeats, e.g. an export of the browser store.
pub fn load_heartbeats(path: &Path) -> Result<Vec<Heartbeat>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read heartbeats from {}", path.display()))?;
    let heartbeats: Vec<Heartbeat> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse heartbeats in {}", path.display()))?;

    if heartbeats.is_empty() {
        log_warn!("No heartbeats found in {}", path.display());
    } else {
        log_info!("Loaded {} heartbeats from {}", heartbeats.len(), path.display());
    }

    Ok(heartbeats)
}

/// Write heartbeats as a JSON array.
pub fn save_heartbeats(path: &Path, heartbeats: &[Heartbeat]) -> Result<()> {
    let serialized = serde_json::to_string_pretty(heartbeats)?;
    fs::write(path, serialized)
        .with_context(|| format!("Failed to write heartbeats to {}", path.display()))
}
