//! Common test utilities for familyhub integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A `models.py` body comfortably above the stub threshold
#[allow(dead_code)]
pub const REAL_MODELS: &str = "from django.db import models\n\n\
class Invoice(models.Model):\n    \
issued = models.DateField()\n    \
amount = models.DecimalField(max_digits=8, decimal_places=2)\n    \
paid = models.BooleanField(default=False)\n";

/// A fake project root with the host portal and standalone modules directories
#[allow(dead_code)]
pub struct TestHub {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestHub {
    /// Create a project root with empty `FamilyHub/apps` and `standalone-apps`
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        std::fs::create_dir_all(path.join("FamilyHub/apps")).expect("Failed to create apps directory");
        std::fs::create_dir_all(path.join("standalone-apps"))
            .expect("Failed to create standalone directory");
        Self { temp, path }
    }

    /// Write a file in the project root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project root
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a path exists in the project root, dangling links included
    pub fn file_exists(&self, path: &str) -> bool {
        std::fs::symlink_metadata(self.path.join(path)).is_ok()
    }

    pub fn is_symlink(&self, path: &str) -> bool {
        std::fs::symlink_metadata(self.path.join(path))
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Relative path of a module's standalone package
    pub fn standalone_rel(key: &str) -> String {
        format!("standalone-apps/{key}/{key}_app")
    }

    /// Relative path of a module's integration target
    pub fn integrated_rel(key: &str) -> String {
        format!("FamilyHub/apps/{key}_app")
    }

    /// Create a standalone module with a real implementation
    pub fn create_standalone_module(&self, key: &str, with_urls: bool) {
        self.write_module(&Self::standalone_rel(key), REAL_MODELS, with_urls);
    }

    /// Create a standalone module whose implementation is a stub
    pub fn create_stub_module(&self, key: &str) {
        self.write_module(&Self::standalone_rel(key), "# TODO\n", true);
    }

    /// Put a real package directly at the integration target, bypassing sync
    pub fn create_integrated_module(&self, key: &str, with_urls: bool) {
        self.write_module(&Self::integrated_rel(key), REAL_MODELS, with_urls);
    }

    fn write_module(&self, dir: &str, models: &str, with_urls: bool) {
        self.write_file(&format!("{dir}/__init__.py"), "");
        self.write_file(&format!("{dir}/models.py"), models);
        if with_urls {
            self.write_file(&format!("{dir}/urls.py"), "urlpatterns = []\n");
        }
    }
}

impl Default for TestHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_creation() {
        let hub = TestHub::new();
        assert!(hub.file_exists("FamilyHub/apps"));
        assert!(hub.file_exists("standalone-apps"));
    }

    #[test]
    fn test_hub_module_layout() {
        let hub = TestHub::new();
        hub.create_standalone_module("timesheet", true);

        assert!(hub.file_exists("standalone-apps/timesheet/timesheet_app/models.py"));
        assert!(hub.file_exists("standalone-apps/timesheet/timesheet_app/urls.py"));
        assert_eq!(
            hub.read_file("standalone-apps/timesheet/timesheet_app/models.py"),
            REAL_MODELS
        );
    }
}
