//! Availability resolution
//!
//! Classifies each catalog module by inspecting the filesystem:
//! - `integrated`: a real package sits at the integration target
//! - `standalone_only`: a real package exists only in the standalone project
//! - `stub`: a package exists but its implementation file is too small
//! - `unavailable`: nothing exists for the module
//!
//! Resolution is read-only. It stats and reads metadata, never writes.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ModuleDescriptor};
use crate::config::HubLayout;

/// Size in bytes an implementation file must EXCEED to count as real.
///
/// A file of exactly this size is a stub.
pub const STUB_THRESHOLD_BYTES: u64 = 100;

/// Primary implementation file of a module package
pub const IMPLEMENTATION_FILE: &str = "models.py";

/// Routing configuration file of a module package
pub const ROUTING_FILE: &str = "urls.py";

/// Availability classification of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Unavailable,
    Stub,
    StandaloneOnly,
    Integrated,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Unavailable => "unavailable",
            Status::Stub => "stub",
            Status::StandaloneOnly => "standalone_only",
            Status::Integrated => "integrated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the integrated package was materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    Symlink,
    Copy,
    None,
}

impl LinkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkMode::Symlink => "symlink",
            LinkMode::Copy => "copy",
            LinkMode::None => "none",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed availability of one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityStatus {
    pub key: String,
    pub status: Status,

    /// A package directory exists at the standalone location
    pub standalone_exists: bool,

    /// Something (possibly a dangling link) exists at the integration target
    pub integrated_exists: bool,

    /// The integration target is a symbolic link
    pub is_symlink: bool,

    /// The classified package has a routing configuration file
    pub urls_available: bool,

    /// The classified package passes the stub threshold
    pub available: bool,

    pub integrated_path: PathBuf,
    pub standalone_path: PathBuf,
}

impl AvailabilityStatus {
    /// Materialization mechanism of the integration target
    pub fn mode(&self) -> LinkMode {
        match (self.integrated_exists, self.is_symlink) {
            (true, true) => LinkMode::Symlink,
            (true, false) => LinkMode::Copy,
            (false, _) => LinkMode::None,
        }
    }

    /// Whether the host may activate and route to this module
    pub fn is_active(&self) -> bool {
        self.status == Status::Integrated && self.available
    }

    /// An integration target exists but does not hold a real package.
    ///
    /// This is what an interrupted sync or a dangling link looks like.
    pub fn is_partial(&self) -> bool {
        self.integrated_exists && self.status == Status::Stub
    }
}

/// Whether `dir` holds a real implementation rather than a stub
pub fn is_real_implementation(dir: &Path) -> bool {
    fs::metadata(dir.join(IMPLEMENTATION_FILE))
        .map(|meta| meta.is_file() && meta.len() > STUB_THRESHOLD_BYTES)
        .unwrap_or(false)
}

fn has_routing(dir: &Path) -> bool {
    dir.join(ROUTING_FILE).is_file()
}

/// Resolves availability against a project layout
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    layout: &'a HubLayout,
}

impl<'a> Resolver<'a> {
    pub fn new(layout: &'a HubLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &HubLayout {
        self.layout
    }

    /// Classify a single module
    pub fn resolve(&self, module: &ModuleDescriptor) -> AvailabilityStatus {
        let integrated_path = self.layout.integrated_path(module);
        let standalone_path = self.layout.standalone_path(module);

        // symlink_metadata so a dangling link still counts as present
        let link_meta = fs::symlink_metadata(&integrated_path).ok();
        let integrated_exists = link_meta.is_some();
        let is_symlink = link_meta.is_some_and(|m| m.file_type().is_symlink());
        let standalone_exists = standalone_path.is_dir();

        let (status, available, urls_available) = if integrated_exists {
            if is_real_implementation(&integrated_path) {
                (Status::Integrated, true, has_routing(&integrated_path))
            } else {
                (Status::Stub, false, false)
            }
        } else if standalone_exists {
            if is_real_implementation(&standalone_path) {
                (Status::StandaloneOnly, true, has_routing(&standalone_path))
            } else {
                (Status::Stub, false, false)
            }
        } else {
            (Status::Unavailable, false, false)
        };

        AvailabilityStatus {
            key: module.key.clone(),
            status,
            standalone_exists,
            integrated_exists,
            is_symlink,
            urls_available,
            available,
            integrated_path,
            standalone_path,
        }
    }

    /// Classify every catalog module, in catalog order
    pub fn resolve_all(&self, catalog: &Catalog) -> Vec<AvailabilityStatus> {
        catalog.iter().map(|module| self.resolve(module)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_hub, write_module, write_real_module};

    fn timesheet() -> ModuleDescriptor {
        ModuleDescriptor::new("timesheet", "Timesheet", 1)
    }

    #[test]
    fn test_nothing_on_disk_is_unavailable() {
        let (_temp, layout) = create_hub();
        let status = Resolver::new(&layout).resolve(&timesheet());

        assert_eq!(status.status, Status::Unavailable);
        assert!(!status.available);
        assert!(!status.standalone_exists);
        assert!(!status.integrated_exists);
        assert_eq!(status.mode(), LinkMode::None);
    }

    #[test]
    fn test_missing_project_root_is_unavailable() {
        let layout = HubLayout::new(Path::new("/definitely/not/here"), "FamilyHub", "apps", "sa");
        let status = Resolver::new(&layout).resolve(&timesheet());
        assert_eq!(status.status, Status::Unavailable);
    }

    #[test]
    fn test_standalone_real_is_standalone_only() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        write_real_module(&layout.standalone_path(&module), true);

        let status = Resolver::new(&layout).resolve(&module);
        assert_eq!(status.status, Status::StandaloneOnly);
        assert!(status.available);
        assert!(status.urls_available);
        assert!(!status.is_active());
    }

    #[test]
    fn test_standalone_stub() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        write_module(&layout.standalone_path(&module), 10, true);

        let status = Resolver::new(&layout).resolve(&module);
        assert_eq!(status.status, Status::Stub);
        assert!(!status.available);
        assert!(!status.urls_available);
        assert!(!status.is_partial());
    }

    #[test]
    fn test_empty_implementation_file_is_stub() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        write_module(&layout.integrated_path(&module), 0, true);

        let status = Resolver::new(&layout).resolve(&module);
        assert_eq!(status.status, Status::Stub);
        assert!(!status.is_active());
        assert!(status.is_partial());
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        let target = layout.integrated_path(&module);

        write_module(&target, STUB_THRESHOLD_BYTES as usize, false);
        assert_eq!(Resolver::new(&layout).resolve(&module).status, Status::Stub);

        write_module(&target, STUB_THRESHOLD_BYTES as usize + 1, false);
        assert_eq!(
            Resolver::new(&layout).resolve(&module).status,
            Status::Integrated
        );
    }

    #[test]
    fn test_integrated_copy_with_urls() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        write_real_module(&layout.integrated_path(&module), true);

        let status = Resolver::new(&layout).resolve(&module);
        assert_eq!(status.status, Status::Integrated);
        assert!(status.is_active());
        assert!(status.urls_available);
        assert_eq!(status.mode(), LinkMode::Copy);
    }

    #[test]
    fn test_integrated_without_urls() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        write_real_module(&layout.integrated_path(&module), false);

        let status = Resolver::new(&layout).resolve(&module);
        assert!(status.is_active());
        assert!(!status.urls_available);
    }

    #[test]
    fn test_integrated_stub_shadows_real_standalone() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        write_real_module(&layout.standalone_path(&module), true);
        write_module(&layout.integrated_path(&module), 5, true);

        let status = Resolver::new(&layout).resolve(&module);
        assert_eq!(status.status, Status::Stub);
        assert!(status.standalone_exists);
        assert!(status.is_partial());
    }

    #[cfg(unix)]
    #[test]
    fn test_integrated_symlink() {
        let (_temp, layout) = create_hub();
        let module = timesheet();
        let source = layout.standalone_path(&module);
        write_real_module(&source, true);
        std::os::unix::fs::symlink(&source, layout.integrated_path(&module)).unwrap();

        let status = Resolver::new(&layout).resolve(&module);
        assert_eq!(status.status, Status::Integrated);
        assert!(status.is_symlink);
        assert_eq!(status.mode(), LinkMode::Symlink);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_partial() {
        let (temp, layout) = create_hub();
        let module = timesheet();
        std::os::unix::fs::symlink(temp.path().join("gone"), layout.integrated_path(&module))
            .unwrap();

        let status = Resolver::new(&layout).resolve(&module);
        assert!(status.integrated_exists);
        assert!(status.is_symlink);
        assert_eq!(status.status, Status::Stub);
        assert!(status.is_partial());
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let (_temp, layout) = create_hub();
        let catalog = Catalog::builtin();
        let module = catalog.require("household_budget").unwrap();
        write_real_module(&layout.standalone_path(module), false);

        let resolver = Resolver::new(&layout);
        assert_eq!(resolver.resolve_all(&catalog), resolver.resolve_all(&catalog));
    }

    #[test]
    fn test_resolve_all_keeps_catalog_order() {
        let (_temp, layout) = create_hub();
        let catalog = Catalog::builtin();
        let keys: Vec<_> = Resolver::new(&layout)
            .resolve_all(&catalog)
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, catalog.keys());
    }
}
