//! BLAKE3 hashing of module trees, used to spot copies that drifted from their source

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;
use walkdir::WalkDir;

use crate::error::{HubError, Result};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Directories the module runtime writes into; never part of the hash
const IGNORED_DIRS: &[&str] = &["__pycache__", ".pytest_cache"];

/// Calculate the BLAKE3 hash of a directory's contents
///
/// Files are hashed sorted by relative path, each preceded by its path, so
/// renames change the hash. Links are followed, which makes a tree and a
/// link to that tree hash the same.
pub fn hash_directory(path: &Path) -> Result<String> {
    if !path.is_dir() {
        return Err(HubError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut hasher = Hasher::new();
    let mut files: Vec<_> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !IGNORED_DIRS.contains(&name.as_ref())
        })
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .collect();

    // Sort for deterministic hashing
    files.sort_by(|a, b| a.path().cmp(b.path()));

    for entry in files {
        let file_path = entry.path();

        let relative_path = file_path
            .strip_prefix(path)
            .unwrap_or(file_path)
            .to_string_lossy()
            .replace('\\', "/");
        hasher.update(relative_path.as_bytes());
        hasher.update(b"\0");

        let file = File::open(file_path).map_err(|e| HubError::FileReadFailed {
            path: file_path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut reader = BufReader::new(file);
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| HubError::FileReadFailed {
                    path: file_path.display().to_string(),
                    reason: e.to_string(),
                })?;

            if bytes_read == 0 {
                break;
            }

            hasher.update(&buffer[..bytes_read]);
        }

        hasher.update(b"\0");
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}
