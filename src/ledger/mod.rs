//! Sync ledger (.familyhub-sync.yaml)
//!
//! Records every integration target the syncer created, so later runs can
//! tell their own targets apart from directories someone put there by hand.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};
use crate::syncer::Mechanism;

/// One materialized module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationLink {
    /// Module key
    pub key: String,

    pub mechanism: Mechanism,

    /// Standalone package the target was made from
    pub source: PathBuf,

    /// Integration target
    pub target: PathBuf,

    /// Content hash of the source at sync time (copies only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// All integration links of a host portal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLedger {
    #[serde(default)]
    pub links: Vec<IntegrationLink>,
}

impl SyncLedger {
    /// Load the ledger; a missing file is an empty ledger
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| HubError::LedgerReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| HubError::LedgerReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Write the ledger through a temp file in the same directory, then rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_failed = |reason: String| HubError::LedgerWriteFailed {
            path: path.display().to_string(),
            reason,
        };

        let parent = path
            .parent()
            .ok_or_else(|| write_failed("ledger path has no parent".to_string()))?;
        fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;

        let yaml = serde_yaml::to_string(self).map_err(|e| write_failed(e.to_string()))?;
        let mut temp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| write_failed(e.to_string()))?;
        temp.write_all(yaml.as_bytes())
            .map_err(|e| write_failed(e.to_string()))?;
        temp.persist(path)
            .map_err(|e| write_failed(e.error.to_string()))?;

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&IntegrationLink> {
        self.links.iter().find(|l| l.key == key)
    }

    /// Insert or replace the link for its module
    pub fn record(&mut self, link: IntegrationLink) {
        match self.links.iter_mut().find(|l| l.key == link.key) {
            Some(existing) => *existing = link,
            None => {
                self.links.push(link);
                self.links.sort_by(|a, b| a.key.cmp(&b.key));
            }
        }
    }

    pub fn forget(&mut self, key: &str) -> Option<IntegrationLink> {
        let idx = self.links.iter().position(|l| l.key == key)?;
        Some(self.links.remove(idx))
    }

    /// Whether `target` was created by a previous sync of `key`
    pub fn owns(&self, key: &str, target: &Path) -> bool {
        self.get(key).is_some_and(|l| l.target == target)
    }
}
