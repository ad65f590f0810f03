//! Template context supplier
//!
//! Built once at startup from the deployment context and the availability
//! scan. Each request only borrows the precomputed flags.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::availability::{AvailabilityStatus, LinkMode, Status};
use crate::catalog::Catalog;
use crate::context::{BASE_TEMPLATE, DeploymentContext};

/// Dashboard card for one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleCard {
    pub key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,

    /// A real implementation exists somewhere
    pub available: bool,

    /// The module is integrated into this process and may be linked to
    pub active: bool,

    pub status: Status,
    pub mode: LinkMode,

    /// Mount point, only for routed modules
    pub url: Option<String>,

    pub priority: i32,
}

/// Flags injected into every rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextFlags {
    pub deployment: DeploymentContext,
    pub standalone_mode: bool,
    pub integrated_mode: bool,

    /// The one base template every page extends
    pub base_template: String,

    /// Chrome the base template renders for this deployment
    pub chrome: String,

    /// Module cards ordered by priority
    pub modules: Vec<ModuleCard>,

    /// Module key to "active in this process"
    pub module_active: BTreeMap<String, bool>,
}

/// Read-only per-request view of deployment and module state
#[derive(Debug, Clone)]
pub struct TemplateContext {
    flags: ContextFlags,
}

impl TemplateContext {
    pub fn new(
        context: DeploymentContext,
        catalog: &Catalog,
        statuses: &[AvailabilityStatus],
    ) -> Self {
        let modules: Vec<ModuleCard> = catalog
            .by_priority()
            .into_iter()
            .map(|module| {
                let status = statuses.iter().find(|s| s.key == module.key);
                let active = status.is_some_and(AvailabilityStatus::is_active);
                let routed = active && status.is_some_and(|s| s.urls_available);

                ModuleCard {
                    key: module.key.clone(),
                    name: module.name.clone(),
                    description: module.description.clone(),
                    icon: module.icon.clone(),
                    color: module.color.clone(),
                    available: status.is_some_and(|s| s.available),
                    active,
                    status: status.map_or(Status::Unavailable, |s| s.status),
                    mode: status.map_or(LinkMode::None, AvailabilityStatus::mode),
                    url: routed.then(|| format!("/{}", module.url_prefix())),
                    priority: module.priority,
                }
            })
            .collect();

        let module_active = modules
            .iter()
            .map(|card| (card.key.clone(), card.active))
            .collect();

        Self {
            flags: ContextFlags {
                deployment: context,
                standalone_mode: context.is_standalone(),
                integrated_mode: context.is_integrated(),
                base_template: BASE_TEMPLATE.to_string(),
                chrome: context.chrome().to_string(),
                modules,
                module_active,
            },
        }
    }

    /// Flags for the current request
    pub fn flags(&self) -> &ContextFlags {
        &self.flags
    }

    pub fn deployment(&self) -> DeploymentContext {
        self.flags.deployment
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.flags.module_active.get(key).copied().unwrap_or(false)
    }

    pub fn card(&self, key: &str) -> Option<&ModuleCard> {
        self.flags.modules.iter().find(|card| card.key == key)
    }

    /// Flags as a JSON object, for template engines fed with JSON
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.flags)
    }
}
