//! Routes command implementation
//!
//! Shows the installed-module list and route triples the host portal would
//! compose from the current filesystem state.

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::cli::RoutesArgs;
use crate::commands::helpers::open_project;
use crate::composer::{Route, compose};
use crate::error::Result;

#[derive(Serialize)]
struct RoutesReport<'a> {
    installed_modules: Vec<String>,
    active_modules: &'a [String],
    routes: &'a [Route],
}

/// Run routes command
pub fn run(root: Option<PathBuf>, args: RoutesArgs) -> Result<()> {
    let project = open_project(root)?;
    let statuses = project.registry.scan();
    let composed = compose(project.registry.catalog(), &statuses);

    let report = RoutesReport {
        installed_modules: composed
            .installed_modules(&project.config.base_modules, &project.config.core_modules),
        active_modules: &composed.active_modules,
        routes: &composed.routes,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let heading = Style::new().bold();
    println!("{}", heading.apply_to("Installed modules:"));
    for name in &report.installed_modules {
        let marker = if report.active_modules.contains(name) { "+" } else { " " };
        println!("  {marker} {name}");
    }

    println!();
    println!("{}", heading.apply_to("Routes:"));
    if report.routes.is_empty() {
        println!("  (none)");
    }
    for route in report.routes {
        println!(
            "  /{:<24} {:<32} namespace={}",
            route.prefix, route.handler, route.namespace
        );
    }

    Ok(())
}
