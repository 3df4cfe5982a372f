//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Where drafts and entitlement records are kept on disk, and how many
/// drafts stay open in memory
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_draft_dir")]
    pub draft_dir: PathBuf,

    #[serde(default = "default_entitlement_dir")]
    pub entitlement_dir: PathBuf,

    /// Open drafts untouched this long are dropped from memory
    #[serde(default = "default_draft_idle_minutes")]
    pub draft_idle_minutes: u64,

    #[serde(default = "default_max_open_drafts")]
    pub max_open_drafts: usize,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.draft_dir.as_os_str().is_empty() || self.entitlement_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidStorageDir);
        }
        if self.draft_idle_minutes == 0 || self.max_open_drafts == 0 {
            return Err(ValidationError::InvalidDraftLimits);
        }
        Ok(())
    }

    pub fn draft_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.draft_idle_minutes.saturating_mul(60))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            draft_dir: default_draft_dir(),
            entitlement_dir: default_entitlement_dir(),
            draft_idle_minutes: default_draft_idle_minutes(),
            max_open_drafts: default_max_open_drafts(),
        }
    }
}

fn default_draft_dir() -> PathBuf {
    PathBuf::from("./data/drafts")
}

fn default_entitlement_dir() -> PathBuf {
    PathBuf::from("./data/entitlements")
}

fn default_draft_idle_minutes() -> u64 {
    30
}

fn default_max_open_drafts() -> usize {
    1024
}
