//! FamilyHub module registry
//!
//! Decides which optional FamilyHub modules are implemented, whether the
//! running process is a standalone module or the integrated portal, and what
//! modules, routes and template flags the portal composes at startup. The
//! operator-facing sync that links or copies modules into the portal lives
//! here too.
//!
//! A host process builds a [`runtime::HubRuntime`] once at startup:
//!
//! ```no_run
//! use std::path::Path;
//!
//! use familyhub::config::HubConfig;
//! use familyhub::runtime::HubRuntime;
//!
//! let root = Path::new("/srv/familyhub");
//! let config = HubConfig::load(root)?;
//! let runtime = HubRuntime::boot(&config, root, &root.join("FamilyHub"));
//!
//! for route in runtime.routes() {
//!     println!("{} -> {}", route.prefix, route.handler);
//! }
//! # Ok::<(), familyhub::error::HubError>(())
//! ```

pub mod availability;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod composer;
pub mod config;
pub mod context;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod linker;
pub mod logging;
pub mod progress;
pub mod registry;
pub mod runtime;
pub mod syncer;
pub mod template_context;

#[cfg(test)]
mod test_fixtures;
