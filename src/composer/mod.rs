//! Dynamic configuration for the host application
//!
//! Turns availability results into the list of modules the host loads and the
//! routes it mounts. Pure: it never looks at the filesystem itself.

use std::collections::HashMap;

use serde::Serialize;

use crate::availability::AvailabilityStatus;
use crate::catalog::Catalog;

/// One mounted route: `(prefix, handler, namespace)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// URL prefix, e.g. "timesheet/"
    pub prefix: String,

    /// Routing configuration reference, e.g. "timesheet_app.urls"
    pub handler: String,

    /// Reverse-lookup namespace, the module key
    pub namespace: String,
}

/// Active modules and routes, ordered by priority
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComposedConfig {
    /// Importable names of integrated modules
    pub active_modules: Vec<String>,

    pub routes: Vec<Route>,
}

impl ComposedConfig {
    /// Full installed-module list: framework modules, core modules, then active modules
    pub fn installed_modules(&self, base_modules: &[String], core_modules: &[String]) -> Vec<String> {
        let mut installed: Vec<String> = Vec::new();
        for name in base_modules
            .iter()
            .chain(core_modules)
            .chain(&self.active_modules)
        {
            if !installed.contains(name) {
                installed.push(name.clone());
            }
        }
        installed
    }
}

/// Compose the active-module and route lists.
///
/// Only `integrated` modules are active; only active modules with a routing
/// file get a route. Statuses for keys outside the catalog are ignored, and
/// catalog modules without a status count as unavailable.
pub fn compose(catalog: &Catalog, statuses: &[AvailabilityStatus]) -> ComposedConfig {
    let by_key: HashMap<&str, &AvailabilityStatus> =
        statuses.iter().map(|s| (s.key.as_str(), s)).collect();

    let mut composed = ComposedConfig::default();
    for module in catalog.by_priority() {
        let Some(status) = by_key.get(module.key.as_str()) else {
            continue;
        };
        if !status.is_active() {
            continue;
        }

        composed.active_modules.push(module.source_module.clone());
        if status.urls_available {
            composed.routes.push(Route {
                prefix: module.url_prefix(),
                handler: module.url_handler(),
                namespace: module.key.clone(),
            });
        }
    }

    composed
}
