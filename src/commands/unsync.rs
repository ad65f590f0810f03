//! Unsync command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::UnsyncArgs;
use crate::commands::helpers::{ALL_MODULES, display_path, open_project, select_modules};
use crate::error::{HubError, Result};
use crate::syncer::UnsyncPlan;

/// Run unsync command
pub fn run(root: Option<PathBuf>, args: UnsyncArgs) -> Result<()> {
    let project = open_project(root)?;
    let keys = select_modules(&project.registry, &args.module)?;
    let syncer = project.registry.syncer();
    let quiet_nothing = args.module == ALL_MODULES;

    let mut removed = 0usize;
    let mut failed = Vec::new();

    for key in &keys {
        match syncer.plan_unsync(key, args.force)? {
            UnsyncPlan::NothingToRemove => {
                if !quiet_nothing {
                    println!("{key} is not integrated. Nothing to remove.");
                }
            }
            UnsyncPlan::Blocked { target } => println!(
                "{} {key}: {} was not created by a previous sync; use --force to remove it",
                Style::new().yellow().apply_to("Skipping"),
                display_path(&project.root, &target)
            ),
            UnsyncPlan::Remove { target } if args.dry_run => {
                removed += 1;
                println!(
                    "[DRY RUN] Would remove {}",
                    display_path(&project.root, &target)
                );
            }
            UnsyncPlan::Remove { target } => match syncer.unsync(key) {
                Ok(()) => {
                    removed += 1;
                    println!(
                        "{} {key} ({})",
                        Style::new().green().bold().apply_to("Removed"),
                        display_path(&project.root, &target)
                    );
                }
                Err(failure) => {
                    println!("{} {key}: {failure}", Style::new().red().bold().apply_to("Failed"));
                    failed.push(key.clone());
                }
            },
        }
    }

    print_summary(removed, args.dry_run);

    if failed.is_empty() {
        Ok(())
    } else {
        Err(HubError::SyncFailed { modules: failed })
    }
}

fn print_summary(removed: usize, dry_run: bool) {
    if dry_run {
        println!("[DRY RUN] Would remove {removed} module(s)");
        return;
    }
    println!("Removed {removed} module(s)");
    if removed > 0 {
        println!("Restart the FamilyHub server processes to drop the removed modules.");
    }
}
