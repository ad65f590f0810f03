//! Process-start facade for the host application
//!
//! `HubRuntime::boot` runs the startup sequence once: detect the deployment
//! context, scan availability, compose modules and routes, and build the
//! template context. The host keeps the runtime for the process lifetime and
//! reads from it per request. Nothing here touches the filesystem after boot;
//! a sync only becomes visible after a restart.

use std::path::Path;

use crate::availability::AvailabilityStatus;
use crate::composer::{ComposedConfig, Route, compose};
use crate::config::HubConfig;
use crate::context::{ContextCell, DeploymentContext, Detection, DetectionInputs};
use crate::registry::Registry;
use crate::template_context::TemplateContext;

/// Startup results, read-only after boot
#[derive(Debug)]
pub struct HubRuntime {
    context: ContextCell,
    statuses: Vec<AvailabilityStatus>,
    composed: ComposedConfig,
    installed_modules: Vec<String>,
    template: TemplateContext,
}

impl HubRuntime {
    /// Boot against the built-in catalog under `root`
    pub fn boot(config: &HubConfig, root: &Path, process_dir: &Path) -> Self {
        Self::boot_with(&Registry::from_config(config, root), config, process_dir)
    }

    /// Boot against an explicitly constructed registry
    pub fn boot_with(registry: &Registry, config: &HubConfig, process_dir: &Path) -> Self {
        let context = ContextCell::new();
        let detection = context.get_or_detect(&DetectionInputs::from_config(config, process_dir));

        let statuses = registry.scan();
        for status in statuses.iter().filter(|s| s.is_partial()) {
            tracing::warn!(
                module = %status.key,
                target = %status.integrated_path.display(),
                "integration target holds no real package; re-run sync"
            );
        }

        let composed = compose(registry.catalog(), &statuses);
        let installed_modules = composed.installed_modules(&config.base_modules, &config.core_modules);
        let template = TemplateContext::new(detection.context, registry.catalog(), &statuses);

        tracing::info!(
            context = %detection.context,
            rule = %detection.rule,
            active = composed.active_modules.len(),
            routes = composed.routes.len(),
            "registry booted"
        );

        Self {
            context,
            statuses,
            composed,
            installed_modules,
            template,
        }
    }

    pub fn detection(&self) -> Option<Detection> {
        self.context.get()
    }

    pub fn deployment(&self) -> DeploymentContext {
        self.template.deployment()
    }

    pub fn statuses(&self) -> &[AvailabilityStatus] {
        &self.statuses
    }

    /// Framework, core, then active module names
    pub fn installed_modules(&self) -> &[String] {
        &self.installed_modules
    }

    pub fn active_modules(&self) -> &[String] {
        &self.composed.active_modules
    }

    pub fn routes(&self) -> &[Route] {
        &self.composed.routes
    }

    pub fn composed(&self) -> &ComposedConfig {
        &self.composed
    }

    /// Per-request view for the presentation layer
    pub fn template_context(&self) -> &TemplateContext {
        &self.template
    }
}
