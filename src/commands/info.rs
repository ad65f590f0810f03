//! Info command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::InfoArgs;
use crate::commands::helpers::{display_path, open_project, styled_status, warn_partial, yes_no};
use crate::commands::status::copy_drift;
use crate::error::Result;
use crate::syncer::Mechanism;

macro_rules! display_field {
    ($label:expr, $value:expr) => {
        println!("{} {}", Style::new().bold().apply_to($label), $value)
    };
}

/// Run info command
pub fn run(root: Option<PathBuf>, args: InfoArgs) -> Result<()> {
    let project = open_project(root)?;
    let module = project.registry.catalog().require(&args.module)?;
    let status = project.registry.status(&module.key)?;
    let ledger = project.registry.ledger()?;

    println!();
    println!("{}", Style::new().bold().yellow().apply_to(&module.name));
    if !module.description.is_empty() {
        println!("{}", module.description);
    }
    println!();

    display_field!("Key:", &module.key);
    display_field!("Priority:", module.priority);
    display_field!("Source module:", &module.source_module);
    display_field!("Standalone project:", &module.standalone_project);
    display_field!("URL prefix:", format!("/{}", module.url_prefix()));
    println!();

    display_field!("Status:", styled_status(status.status, 0));
    display_field!("Available:", yes_no(status.available));
    display_field!("URLs:", yes_no(status.urls_available));
    display_field!("Mode:", status.mode());
    display_field!(
        "Standalone path:",
        display_path(&project.root, &status.standalone_path)
    );
    display_field!(
        "Integrated path:",
        display_path(&project.root, &status.integrated_path)
    );

    match ledger.get(&module.key) {
        Some(link) => {
            display_field!("Synced via:", link.mechanism);
            if link.mechanism == Mechanism::Copy {
                display_field!("Drift:", copy_drift(link).describe());
            }
        }
        None => {
            display_field!("Synced via:", "not recorded");
        }
    }

    if status.is_partial() {
        println!();
        warn_partial(&status);
    }

    Ok(())
}
