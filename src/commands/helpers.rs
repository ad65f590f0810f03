//! Command helper utilities

use std::path::{Path, PathBuf};

use console::Style;

use crate::availability::{AvailabilityStatus, Status};
use crate::config::HubConfig;
use crate::error::{HubError, Result};
use crate::registry::Registry;

/// Module argument selecting every catalog module
pub const ALL_MODULES: &str = "all";

/// An opened project root
pub struct Project {
    pub root: PathBuf,
    pub config: HubConfig,
    pub registry: Registry,
}

/// Resolve root path from optional argument
///
/// If a root path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_root_path(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| HubError::IoError {
            message: format!("Failed to get current directory: {e}"),
        }),
    }
}

/// Open the project at `root`, loading its configuration.
///
/// The root must contain the host portal directory or the standalone
/// modules directory.
pub fn open_project(root: Option<PathBuf>) -> Result<Project> {
    let root = resolve_root_path(root)?;
    if !root.is_dir() {
        return Err(HubError::ProjectRootNotFound {
            path: root.display().to_string(),
        });
    }
    // Ledger ownership compares paths, so one spelling per root
    let root = dunce::canonicalize(&root).unwrap_or(root);

    let config = HubConfig::load(&root)?;
    let registry = Registry::from_config(&config, &root);
    let layout = registry.layout();
    if !layout.host_dir().is_dir() && !layout.standalone_dir().is_dir() {
        return Err(HubError::ProjectRootNotFound {
            path: root.display().to_string(),
        });
    }

    tracing::debug!(root = %root.display(), "project opened");
    Ok(Project {
        root,
        config,
        registry,
    })
}

/// Expand a module argument into catalog keys, in priority order
pub fn select_modules(registry: &Registry, module: &str) -> Result<Vec<String>> {
    if module == ALL_MODULES {
        return Ok(registry
            .catalog()
            .by_priority()
            .into_iter()
            .map(|m| m.key.clone())
            .collect());
    }
    Ok(vec![registry.catalog().require(module)?.key.clone()])
}

/// Status name padded to `width` and styled by severity
pub fn styled_status(status: Status, width: usize) -> String {
    let style = match status {
        Status::Integrated => Style::new().green(),
        Status::StandaloneOnly => Style::new().cyan(),
        Status::Stub => Style::new().yellow(),
        Status::Unavailable => Style::new().dim(),
    };
    style
        .apply_to(format!("{:<width$}", status.as_str()))
        .to_string()
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Warn about an integration target that holds no real package
pub fn warn_partial(status: &AvailabilityStatus) {
    println!(
        "{} {} has an integration target without a real package at {}",
        Style::new().yellow().bold().apply_to("Warning:"),
        status.key,
        status.integrated_path.display()
    );
    println!("  Re-run: familyhub sync {} --force", status.key);
}

/// Path shown relative to the project root when possible
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map_or_else(|_| path.display().to_string(), |p| p.display().to_string())
}
