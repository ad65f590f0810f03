//! Module catalog
//!
//! This module handles:
//! - Module descriptors (static metadata for each optional feature module)
//! - Catalog construction and lookup by key
//! - The built-in FamilyHub module list (via defaults module)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{HubError, Result};

pub mod defaults;

/// An optional feature module known to the portal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique short identifier (e.g., "timesheet")
    pub key: String,

    /// Display name for navigation and dashboard cards
    pub name: String,

    /// One-line description for dashboard cards
    pub description: String,

    /// Icon class used by the presentation layer
    pub icon: String,

    /// Color hint used by the presentation layer
    pub color: String,

    /// Importable package name the module's code uses (e.g., "timesheet_app")
    pub source_module: String,

    /// Package directory inside the module's standalone project
    pub standalone_project: String,

    /// Sort order, lower first
    pub priority: i32,
}

impl ModuleDescriptor {
    /// Create a descriptor following the `<key>_app` naming convention
    pub fn new(key: impl Into<String>, name: impl Into<String>, priority: i32) -> Self {
        let key = key.into();
        let package = format!("{key}_app");
        Self {
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
            source_module: package.clone(),
            standalone_project: package,
            priority,
            key,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Override the importable package name
    pub fn with_source_module(mut self, source_module: impl Into<String>) -> Self {
        self.source_module = source_module.into();
        self
    }

    /// Override the package directory inside the standalone project
    pub fn with_standalone_project(mut self, project: impl Into<String>) -> Self {
        self.standalone_project = project.into();
        self
    }

    /// Route prefix under which the module is mounted (e.g., "timesheet/")
    pub fn url_prefix(&self) -> String {
        format!("{}/", self.key)
    }

    /// Handler reference for the module's routing configuration
    pub fn url_handler(&self) -> String {
        format!("{}.urls", self.source_module)
    }
}

/// Immutable, key-indexed list of module descriptors
#[derive(Debug, Clone)]
pub struct Catalog {
    modules: Vec<ModuleDescriptor>,
    by_key: HashMap<String, usize>,
}

impl Catalog {
    /// Create a catalog, rejecting duplicate keys
    pub fn new(modules: Vec<ModuleDescriptor>) -> Result<Self> {
        let mut by_key = HashMap::with_capacity(modules.len());
        for (idx, module) in modules.iter().enumerate() {
            if by_key.insert(module.key.clone(), idx).is_some() {
                return Err(HubError::DuplicateModuleKey {
                    key: module.key.clone(),
                });
            }
        }

        Ok(Self { modules, by_key })
    }

    /// The built-in FamilyHub catalog
    pub fn builtin() -> Self {
        let modules = defaults::default_modules();
        let by_key = modules
            .iter()
            .enumerate()
            .map(|(idx, m)| (m.key.clone(), idx))
            .collect();

        Self { modules, by_key }
    }

    /// Get a descriptor by key
    pub fn get(&self, key: &str) -> Option<&ModuleDescriptor> {
        self.by_key.get(key).and_then(|&idx| self.modules.get(idx))
    }

    /// Get a descriptor by key or fail with `UnknownModule`
    pub fn require(&self, key: &str) -> Result<&ModuleDescriptor> {
        self.get(key).ok_or_else(|| HubError::UnknownModule {
            key: key.to_string(),
        })
    }

    /// All descriptors in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    /// All descriptors ordered by ascending priority, ties broken by key
    pub fn by_priority(&self) -> Vec<&ModuleDescriptor> {
        let mut sorted: Vec<_> = self.modules.iter().collect();
        sorted.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.key.cmp(&b.key)));
        sorted
    }

    pub fn keys(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
