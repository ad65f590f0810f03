//! Module registry service
//!
//! Pairs the module catalog with a project layout. Constructed explicitly and
//! passed to whoever needs it; there is no process-wide instance.

use std::path::Path;

use crate::availability::{AvailabilityStatus, Resolver};
use crate::catalog::Catalog;
use crate::config::{HubConfig, HubLayout};
use crate::error::Result;
use crate::ledger::SyncLedger;
use crate::linker::Linker;
use crate::syncer::Syncer;

/// Catalog plus the filesystem layout it resolves against
#[derive(Debug, Clone)]
pub struct Registry {
    catalog: Catalog,
    layout: HubLayout,
}

impl Registry {
    pub fn new(catalog: Catalog, layout: HubLayout) -> Self {
        Self { catalog, layout }
    }

    /// Registry over the built-in catalog for a configured project root
    pub fn from_config(config: &HubConfig, root: &Path) -> Self {
        Self::new(Catalog::builtin(), config.layout(root))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &HubLayout {
        &self.layout
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.layout)
    }

    /// Availability of one module
    pub fn status(&self, key: &str) -> Result<AvailabilityStatus> {
        let module = self.catalog.require(key)?;
        Ok(self.resolver().resolve(module))
    }

    /// Availability of every catalog module, in priority order
    pub fn scan(&self) -> Vec<AvailabilityStatus> {
        let resolver = self.resolver();
        self.catalog
            .by_priority()
            .into_iter()
            .map(|module| resolver.resolve(module))
            .collect()
    }

    pub fn ledger(&self) -> Result<SyncLedger> {
        SyncLedger::load(&self.layout.ledger_path())
    }

    pub fn syncer(&self) -> Syncer<'_> {
        Syncer::new(&self.catalog, &self.layout)
    }

    pub fn syncer_with<L: Linker>(&self, linker: L) -> Syncer<'_, L> {
        Syncer::with_linker(&self.catalog, &self.layout, linker)
    }
}
