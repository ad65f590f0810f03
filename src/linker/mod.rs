//! Filesystem mutation primitives used by the syncer
//!
//! Everything that creates or deletes directory trees goes through [`Linker`],
//! so tests can inject failures without platform privileges.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Mutating filesystem operations needed to materialize a module
pub trait Linker {
    /// Create a directory symbolic link at `target` pointing to `source`
    fn symlink_dir(&self, source: &Path, target: &Path) -> io::Result<()>;

    /// Recursively copy `source` into a new directory `target`
    fn copy_tree(&self, source: &Path, target: &Path) -> io::Result<()>;

    /// Atomically move `from` to `to` (same parent filesystem)
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove `target`: unlink a link, delete a tree. Absent is not an error.
    fn remove(&self, target: &Path) -> io::Result<()>;

    /// Create `dir` and any missing parents
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;
}

/// The real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLinker;

impl Linker for FsLinker {
    fn symlink_dir(&self, source: &Path, target: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(source, target)
        }
        #[cfg(windows)]
        {
            std::os::windows::fs::symlink_dir(source, target)
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = (source, target);
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "symbolic links are not supported on this platform",
            ))
        }
    }

    fn copy_tree(&self, source: &Path, target: &Path) -> io::Result<()> {
        copy_dir_recursive(source, target)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, target: &Path) -> io::Result<()> {
        let meta = match fs::symlink_metadata(target) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        if meta.file_type().is_symlink() {
            // Directory links on Windows are removed as directories
            fs::remove_file(target).or_else(|_| fs::remove_dir(target))
        } else if meta.is_dir() {
            fs::remove_dir_all(target)
        } else {
            fs::remove_file(target)
        }
    }

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }
}

/// Copy a directory tree. Links inside the source are followed, so the copy
/// holds plain files only.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let dst_path = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst_path)?;
        } else {
            fs::copy(entry.path(), &dst_path)?;
        }
    }

    Ok(())
}

/// Whether `dir` is a directory (following links) with at least one entry
pub fn is_non_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
