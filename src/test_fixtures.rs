//! Test fixtures for laying out fake project roots.
//!
//! ```ignore
//! use crate::test_fixtures::{create_hub, write_real_module};
//!
//! #[test]
//! fn my_test() {
//!     let (temp, layout) = create_hub();
//!     write_real_module(&temp.path().join("standalone-apps/timesheet/timesheet_app"), true);
//! }
//! ```

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::config::{HubConfig, HubLayout};

/// A `models.py` body comfortably above the stub threshold
pub const REAL_MODELS: &str = "from django.db import models\n\n\
class Entry(models.Model):\n    \
started = models.DateTimeField()\n    \
finished = models.DateTimeField(null=True)\n    \
notes = models.TextField(blank=True)\n";

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a project root with empty host and standalone directories.
///
/// # Panics
///
/// Panics if the directories cannot be created.
#[must_use]
pub fn create_hub() -> (TempDir, HubLayout) {
    let temp = create_temp_dir();
    let layout = HubConfig::default().layout(temp.path());
    fs::create_dir_all(layout.apps_dir()).expect("Failed to create apps directory");
    fs::create_dir_all(layout.standalone_dir()).expect("Failed to create standalone directory");
    (temp, layout)
}

/// Write a package whose implementation file is exactly `models_len` bytes.
///
/// # Panics
///
/// Panics if the package cannot be written.
pub fn write_module(dir: &Path, models_len: usize, with_urls: bool) {
    fs::create_dir_all(dir).expect("Failed to create package directory");
    fs::write(dir.join("__init__.py"), "").expect("Failed to write __init__.py");
    fs::write(dir.join("models.py"), "#".repeat(models_len)).expect("Failed to write models.py");
    if with_urls {
        fs::write(dir.join("urls.py"), "urlpatterns = []\n").expect("Failed to write urls.py");
    }
}

/// Write a package with a real implementation file.
///
/// # Panics
///
/// Panics if the package cannot be written.
pub fn write_real_module(dir: &Path, with_urls: bool) {
    fs::create_dir_all(dir).expect("Failed to create package directory");
    fs::write(dir.join("__init__.py"), "").expect("Failed to write __init__.py");
    fs::write(dir.join("models.py"), REAL_MODELS).expect("Failed to write models.py");
    if with_urls {
        fs::write(dir.join("urls.py"), "urlpatterns = []\n").expect("Failed to write urls.py");
    }
}
