//! Integration sync
//!
//! Materializes a module's standalone package at the host portal's
//! integration target, by symbolic link or by full copy.
//!
//! ## Guarantees
//!
//! - A missing standalone source fails before anything is touched.
//! - An existing target is removed completely before the new one is created,
//!   so running the same sync twice ends in the same state. It is renamed
//!   aside first, so a removal that fails partway never leaves a
//!   half-deleted target behind.
//! - Copies are written to a hidden staging directory next to the target and
//!   renamed into place. On failure the staging directory is removed and the
//!   target is left absent, never half-populated.
//! - A denied symbolic link is a failure. The syncer never falls back to copying.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::availability::LinkMode;
use crate::catalog::{Catalog, ModuleDescriptor};
use crate::config::HubLayout;
use crate::error::Result;
use crate::hash::hash_directory;
use crate::ledger::{IntegrationLink, SyncLedger};
use crate::linker::{FsLinker, Linker, is_non_empty_dir};

mod staging;

use staging::Staging;

/// How a module is materialized
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    Symlink,
    Copy,
}

impl Mechanism {
    pub fn as_str(self) -> &'static str {
        match self {
            Mechanism::Symlink => "symlink",
            Mechanism::Copy => "copy",
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a sync did not happen. Expected conditions, not faults.
#[derive(Debug, Error)]
pub enum SyncFailure {
    #[error("unknown module '{key}'")]
    UnknownModule { key: String },

    #[error("standalone source not found at {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("failed to prepare {}: {source}", path.display())]
    PrepareFailed { path: PathBuf, source: io::Error },

    #[error("failed to remove existing target {}: {source}", path.display())]
    RemoveFailed { path: PathBuf, source: io::Error },

    #[error("failed to create symbolic link {}: {source}", path.display())]
    LinkFailed { path: PathBuf, source: io::Error },

    #[error("failed to copy into {}: {source}", path.display())]
    CopyFailed { path: PathBuf, source: io::Error },

    #[error("target {} is empty after sync", path.display())]
    EmptyTarget { path: PathBuf },
}

impl SyncFailure {
    /// Symbolic link creation was refused, typically for lack of privilege
    pub fn is_link_denied(&self) -> bool {
        matches!(self, SyncFailure::LinkFailed { .. })
    }
}

/// What a sync would do, computed without touching the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPlan {
    MissingSource {
        source: PathBuf,
    },
    /// A target exists that no previous sync created; needs `--force`
    Blocked {
        target: PathBuf,
        existing: LinkMode,
    },
    Create {
        source: PathBuf,
        target: PathBuf,
        mechanism: Mechanism,
    },
    Replace {
        source: PathBuf,
        target: PathBuf,
        mechanism: Mechanism,
        existing: LinkMode,
    },
}

impl SyncPlan {
    pub fn will_mutate(&self) -> bool {
        matches!(self, SyncPlan::Create { .. } | SyncPlan::Replace { .. })
    }
}

/// What an unsync would do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsyncPlan {
    NothingToRemove,
    /// The target exists but no previous sync created it; needs `--force`
    Blocked { target: PathBuf },
    Remove { target: PathBuf },
}

/// Materializes standalone modules into the host portal
pub struct Syncer<'a, L: Linker = FsLinker> {
    catalog: &'a Catalog,
    layout: &'a HubLayout,
    linker: L,
}

impl<'a> Syncer<'a, FsLinker> {
    pub fn new(catalog: &'a Catalog, layout: &'a HubLayout) -> Self {
        Self::with_linker(catalog, layout, FsLinker)
    }
}

impl<'a, L: Linker> Syncer<'a, L> {
    pub fn with_linker(catalog: &'a Catalog, layout: &'a HubLayout, linker: L) -> Self {
        Self {
            catalog,
            layout,
            linker,
        }
    }

    /// Sync a module, reporting only success
    pub fn sync(&self, key: &str, mechanism: Mechanism) -> bool {
        match self.try_sync(key, mechanism) {
            Ok(_) => true,
            Err(failure) => {
                tracing::warn!(module = key, %mechanism, "sync failed: {failure}");
                false
            }
        }
    }

    /// Sync a module and record it in the ledger
    pub fn try_sync(
        &self,
        key: &str,
        mechanism: Mechanism,
    ) -> std::result::Result<IntegrationLink, SyncFailure> {
        let module = self.module(key)?;
        let link = match self.materialize(module, mechanism) {
            Ok(link) => link,
            Err(failure) => {
                // A removed target is no longer ours to track
                let target = self.layout.integrated_path(module);
                if !matches!(failure, SyncFailure::MissingSource { .. })
                    && existing_mode(&target).is_none()
                {
                    self.update_ledger(|ledger| ledger.forget(key).is_some());
                }
                return Err(failure);
            }
        };
        tracing::info!(
            module = key,
            %mechanism,
            target = %link.target.display(),
            "module synced"
        );
        self.update_ledger(|ledger| {
            ledger.record(link.clone());
            true
        });
        Ok(link)
    }

    /// Decide what `sync` would do. Read-only.
    pub fn plan(&self, key: &str, mechanism: Mechanism, force: bool) -> Result<SyncPlan> {
        let module = self.catalog.require(key)?;
        let source = self.layout.standalone_path(module);
        let target = self.layout.integrated_path(module);

        if !source.is_dir() {
            return Ok(SyncPlan::MissingSource { source });
        }

        let Some(existing) = existing_mode(&target) else {
            return Ok(SyncPlan::Create {
                source,
                target,
                mechanism,
            });
        };

        let ledger = SyncLedger::load(&self.layout.ledger_path())?;
        if force || ledger.owns(key, &target) {
            Ok(SyncPlan::Replace {
                source,
                target,
                mechanism,
                existing,
            })
        } else {
            Ok(SyncPlan::Blocked { target, existing })
        }
    }

    /// Decide what `unsync` would do. Read-only.
    pub fn plan_unsync(&self, key: &str, force: bool) -> Result<UnsyncPlan> {
        let module = self.catalog.require(key)?;
        let target = self.layout.integrated_path(module);

        if existing_mode(&target).is_none() {
            return Ok(UnsyncPlan::NothingToRemove);
        }

        let ledger = SyncLedger::load(&self.layout.ledger_path())?;
        if force || ledger.owns(key, &target) {
            Ok(UnsyncPlan::Remove { target })
        } else {
            Ok(UnsyncPlan::Blocked { target })
        }
    }

    /// Remove a module's integration target and its ledger entry
    pub fn unsync(&self, key: &str) -> std::result::Result<(), SyncFailure> {
        let module = self.module(key)?;
        let target = self.layout.integrated_path(module);

        self.clear_target(module, &target)?;

        tracing::info!(module = key, target = %target.display(), "module unsynced");
        self.update_ledger(|ledger| ledger.forget(key).is_some());
        Ok(())
    }

    fn module(&self, key: &str) -> std::result::Result<&'a ModuleDescriptor, SyncFailure> {
        self.catalog
            .get(key)
            .ok_or_else(|| SyncFailure::UnknownModule {
                key: key.to_string(),
            })
    }

    fn materialize(
        &self,
        module: &ModuleDescriptor,
        mechanism: Mechanism,
    ) -> std::result::Result<IntegrationLink, SyncFailure> {
        let source = self.layout.standalone_path(module);
        let target = self.layout.integrated_path(module);

        if !source.is_dir() {
            return Err(SyncFailure::MissingSource { path: source });
        }

        let apps_dir = self.layout.apps_dir();
        self.linker
            .ensure_dir(apps_dir)
            .map_err(|source| SyncFailure::PrepareFailed {
                path: apps_dir.to_path_buf(),
                source,
            })?;

        self.clear_target(module, &target)?;

        match mechanism {
            Mechanism::Symlink => {
                // Relative link targets would resolve against the apps directory
                let absolute = dunce::canonicalize(&source).unwrap_or_else(|_| source.clone());
                if let Err(source) = self.linker.symlink_dir(&absolute, &target) {
                    self.discard(&target);
                    return Err(SyncFailure::LinkFailed {
                        path: target,
                        source,
                    });
                }
            }
            Mechanism::Copy => self.copy_into_place(module, &source, &target)?,
        }

        if !is_non_empty_dir(&target) {
            self.discard(&target);
            return Err(SyncFailure::EmptyTarget { path: target });
        }

        let hash = match mechanism {
            Mechanism::Copy => hash_directory(&source).ok(),
            Mechanism::Symlink => None,
        };

        Ok(IntegrationLink {
            key: module.key.clone(),
            mechanism,
            source,
            target,
            hash,
        })
    }

    /// Move whatever sits at `target` aside, then delete it.
    ///
    /// The rename either happens or leaves the target untouched, so a failed
    /// delete can only leave debris in the hidden `.removing` directory.
    fn clear_target(
        &self,
        module: &ModuleDescriptor,
        target: &Path,
    ) -> std::result::Result<(), SyncFailure> {
        let removing = self
            .layout
            .apps_dir()
            .join(format!(".{}.removing", module.source_module));
        let remove_failed = |source: io::Error| SyncFailure::RemoveFailed {
            path: target.to_path_buf(),
            source,
        };

        // Leftover from an earlier failed delete
        self.linker.remove(&removing).map_err(remove_failed)?;
        if existing_mode(target).is_none() {
            return Ok(());
        }

        self.linker.rename(target, &removing).map_err(remove_failed)?;
        if existing_mode(target).is_some() {
            return Err(remove_failed(io::Error::other(
                "target still present after removal",
            )));
        }

        // Never committed: dropping the guard deletes the moved tree
        drop(Staging::new(removing, &self.linker));
        Ok(())
    }

    fn copy_into_place(
        &self,
        module: &ModuleDescriptor,
        source: &Path,
        target: &Path,
    ) -> std::result::Result<(), SyncFailure> {
        let staging_path = self
            .layout
            .apps_dir()
            .join(format!(".{}.partial", module.source_module));
        let copy_failed = |path: &Path, source: io::Error| SyncFailure::CopyFailed {
            path: path.to_path_buf(),
            source,
        };

        // Leftover from an interrupted run
        self.linker
            .remove(&staging_path)
            .map_err(|e| copy_failed(&staging_path, e))?;

        let staging = Staging::new(staging_path, &self.linker);
        self.linker
            .copy_tree(source, staging.path())
            .map_err(|e| copy_failed(staging.path(), e))?;
        self.linker
            .rename(staging.path(), target)
            .map_err(|e| copy_failed(target, e))?;
        staging.commit();

        Ok(())
    }

    fn discard(&self, target: &Path) {
        if let Err(e) = self.linker.remove(target) {
            tracing::warn!(target = %target.display(), "failed to clean up target: {e}");
        }
    }

    /// Apply `change` and save, unless it reports nothing changed
    fn update_ledger(&self, change: impl FnOnce(&mut SyncLedger) -> bool) {
        let path = self.layout.ledger_path();
        let result = SyncLedger::load(&path).and_then(|mut ledger| {
            if change(&mut ledger) {
                ledger.save(&path)
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            tracing::warn!(ledger = %path.display(), "sync ledger not updated: {e}");
        }
    }
}

/// Mode of whatever sits at `target`, dangling links included
fn existing_mode(target: &Path) -> Option<LinkMode> {
    let meta = fs::symlink_metadata(target).ok()?;
    if meta.file_type().is_symlink() {
        Some(LinkMode::Symlink)
    } else {
        Some(LinkMode::Copy)
    }
}

#[cfg(test)]
mod tests;
