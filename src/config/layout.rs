//! Filesystem layout of a FamilyHub project root
//!
//! ```text
//! <root>/
//!   FamilyHub/                  host portal
//!     apps/<source_module>/     integration target, one per module
//!     .familyhub-sync.yaml      sync ledger
//!   standalone-apps/
//!     <key>/<standalone_project>/   standalone source, one per module
//! ```

use std::path::{Path, PathBuf};

use crate::catalog::ModuleDescriptor;

/// Sync ledger file name, inside the host portal directory
pub const LEDGER_FILE: &str = ".familyhub-sync.yaml";

/// Resolved directories of a project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubLayout {
    root: PathBuf,
    host_dir: PathBuf,
    apps_dir: PathBuf,
    standalone_dir: PathBuf,
}

impl HubLayout {
    pub fn new(root: &Path, host_dir: &str, apps_dir: &str, standalone_dir: &str) -> Self {
        let host = root.join(host_dir);
        Self {
            root: root.to_path_buf(),
            apps_dir: host.join(apps_dir),
            host_dir: host,
            standalone_dir: root.join(standalone_dir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn host_dir(&self) -> &Path {
        &self.host_dir
    }

    /// Directory holding every integrated module
    pub fn apps_dir(&self) -> &Path {
        &self.apps_dir
    }

    pub fn standalone_dir(&self) -> &Path {
        &self.standalone_dir
    }

    /// Where the host portal expects the module's package
    pub fn integrated_path(&self, module: &ModuleDescriptor) -> PathBuf {
        self.apps_dir.join(&module.source_module)
    }

    /// Where the module's standalone project keeps its package
    pub fn standalone_path(&self, module: &ModuleDescriptor) -> PathBuf {
        self.standalone_dir
            .join(&module.key)
            .join(&module.standalone_project)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.host_dir.join(LEDGER_FILE)
    }
}
