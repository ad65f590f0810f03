//! Staging directory guard for copies
//!
//! Also used to delete a target that was renamed aside before replacement.
//!
//! ```ignore
//! let staging = Staging::new(path, &linker);
//! linker.copy_tree(source, staging.path())?;
//! linker.rename(staging.path(), target)?;
//!
//! // On success:
//! staging.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // the staging directory is removed
//! ```

use std::path::{Path, PathBuf};

use crate::linker::Linker;

/// Removes its directory on drop unless committed
pub(super) struct Staging<'l, L: Linker> {
    path: PathBuf,
    linker: &'l L,
    committed: bool,
}

impl<'l, L: Linker> Staging<'l, L> {
    pub(super) fn new(path: PathBuf, linker: &'l L) -> Self {
        Self {
            path,
            linker,
            committed: false,
        }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    /// The staged tree has been moved into place; nothing to clean up
    pub(super) fn commit(mut self) {
        self.committed = true;
    }
}

impl<L: Linker> Drop for Staging<'_, L> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = self.linker.remove(&self.path) {
            tracing::warn!(staging = %self.path.display(), "failed to remove staging directory: {e}");
        }
    }
}
