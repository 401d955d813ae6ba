use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use crate::capture::CaptureState;
use crate::error::{EngineError, EngineResult};

const MS_PER_MINUTE: f64 = 60.0 * 1000.0;

/// Maximum gap between consecutive heartbeats of one session, in ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeoutPreference(i64);

impl TimeoutPreference {
    pub fn from_millis(ms: i64) -> EngineResult<Self> {
        if ms < 0 {
            return Err(EngineError::invalid(format!(
                "timeout must be non-negative, got {ms}ms"
            )));
        }
        Ok(Self(ms))
    }

    pub fn from_minutes(minutes: f64) -> EngineResult<Self> {
        Self::scaled(minutes, MS_PER_MINUTE)
    }

    /// `value * conversion_factor` milliseconds, truncated.
    pub fn scaled(value: f64, conversion_factor: f64) -> EngineResult<Self> {
        let ms = value * conversion_factor;
        if !ms.is_finite() {
            return Err(EngineError::invalid(format!(
                "timeout must be finite, got {value} x {conversion_factor}"
            )));
        }
        if ms < 0.0 {
            return Err(EngineError::invalid(format!(
                "timeout must be non-negative, got {ms}ms"
            )));
        }
        Ok(Self(ms.trunc() as i64))
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Session timeout, in minutes.
    pub timeout_minutes: f64,
    /// Minimum gap between interaction heartbeats on the same page.
    pub interaction_interval_ms: i64,
    /// Number of entries shown in rankings.
    pub top_limit: usize,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            timeout_minutes: 15.0,
            interaction_interval_ms: 120_000,
            top_limit: 10,
        }
    }
}

impl UserSettings {
    pub fn timeout(&self) -> EngineResult<TimeoutPreference> {
        TimeoutPreference::from_minutes(self.timeout_minutes)
    }

    /// A fresh capture state throttled by `interaction_interval_ms`.
    pub fn capture_state(&self) -> EngineResult<CaptureState> {
        if self.interaction_interval_ms < 0 {
            return Err(EngineError::invalid(format!(
                "interaction interval must be non-negative, got {}ms",
                self.interaction_interval_ms
            )));
        }
        Ok(CaptureState::new(self.interaction_interval_ms))
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable settings in {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> UserSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn timeout(&self) -> EngineResult<TimeoutPreference> {
        self.current().timeout()
    }

    pub fn update(&self, settings: UserSettings) -> Result<()> {
        settings.timeout()?;
        settings.capture_state()?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = data;
        Ok(())
    }
}
