//! Sync command implementation
//!
//! Links or copies standalone modules into the host portal. A missing source
//! or a target that needs `--force` is reported and skipped; only an attempted
//! sync that fails makes the command fail.

use std::path::PathBuf;

use console::Style;

use crate::cli::SyncArgs;
use crate::commands::helpers::{ALL_MODULES, Project, display_path, open_project, select_modules};
use crate::error::{HubError, Result};
use crate::progress::SyncProgress;
use crate::syncer::{Mechanism, SyncPlan};

/// Run sync command
pub fn run(root: Option<PathBuf>, args: SyncArgs) -> Result<()> {
    let project = open_project(root)?;
    let keys = select_modules(&project.registry, &args.module)?;

    if cfg!(windows) && args.method == Mechanism::Symlink && !args.dry_run {
        println!(
            "{} symbolic links on Windows need Developer Mode or an elevated shell; \
             use --method copy otherwise",
            Style::new().yellow().bold().apply_to("Note:")
        );
    }

    if args.dry_run {
        return dry_run(&project, &keys, &args);
    }

    let progress = if args.module == ALL_MODULES {
        SyncProgress::new(keys.len() as u64)
    } else {
        SyncProgress::hidden()
    };

    let mut synced = Vec::new();
    let mut failed = Vec::new();
    let mut skipped = 0usize;

    for (idx, key) in keys.iter().enumerate() {
        progress.update_module(key, idx + 1, keys.len());
        match sync_module(&project, key, &args, &progress)? {
            Outcome::Synced => synced.push(key.clone()),
            Outcome::Skipped => skipped += 1,
            Outcome::Failed => failed.push(key.clone()),
        }
        progress.inc_module();
    }

    if failed.is_empty() {
        progress.finish();
    } else {
        progress.abandon();
    }

    print_summary(&synced, skipped, args.method);

    if failed.is_empty() {
        Ok(())
    } else {
        Err(HubError::SyncFailed { modules: failed })
    }
}

enum Outcome {
    Synced,
    Skipped,
    Failed,
}

fn sync_module(project: &Project, key: &str, args: &SyncArgs, progress: &SyncProgress) -> Result<Outcome> {
    let syncer = project.registry.syncer();

    match syncer.plan(key, args.method, args.force)? {
        SyncPlan::MissingSource { source } => {
            progress.println(format!(
                "{} {key}: no standalone source at {}",
                Style::new().yellow().apply_to("Skipping"),
                display_path(&project.root, &source)
            ));
            Ok(Outcome::Skipped)
        }
        SyncPlan::Blocked { target, existing } => {
            progress.println(format!(
                "{} {key}: {} exists ({existing}) and was not created by a previous sync; \
                 use --force to overwrite",
                Style::new().yellow().apply_to("Skipping"),
                display_path(&project.root, &target)
            ));
            Ok(Outcome::Skipped)
        }
        SyncPlan::Create { .. } | SyncPlan::Replace { .. } => match syncer.try_sync(key, args.method) {
            Ok(link) => {
                progress.println(format!(
                    "{} {key} ({}) -> {}",
                    Style::new().green().bold().apply_to("Synced"),
                    link.mechanism,
                    display_path(&project.root, &link.target)
                ));
                let status = project.registry.status(key)?;
                if !status.available {
                    progress.println(format!(
                        "{} {key} synced but its {} is a stub; it will stay inactive",
                        Style::new().yellow().bold().apply_to("Warning:"),
                        crate::availability::IMPLEMENTATION_FILE
                    ));
                }
                Ok(Outcome::Synced)
            }
            Err(failure) => {
                progress.println(format!(
                    "{} {key}: {failure}",
                    Style::new().red().bold().apply_to("Failed"),
                ));
                if failure.is_link_denied() {
                    progress.println(format!("  Retry with: familyhub sync {key} --method copy"));
                }
                Ok(Outcome::Failed)
            }
        },
    }
}

fn dry_run(project: &Project, keys: &[String], args: &SyncArgs) -> Result<()> {
    let syncer = project.registry.syncer();
    let mut would_sync = 0usize;

    for key in keys {
        match syncer.plan(key, args.method, args.force)? {
            SyncPlan::MissingSource { source } => println!(
                "[DRY RUN] Would skip {key}: no standalone source at {}",
                display_path(&project.root, &source)
            ),
            SyncPlan::Blocked { target, existing } => println!(
                "[DRY RUN] Would skip {key}: {} exists ({existing}), needs --force",
                display_path(&project.root, &target)
            ),
            SyncPlan::Create {
                source,
                target,
                mechanism,
            } => {
                would_sync += 1;
                println!(
                    "[DRY RUN] Would {} {} -> {}",
                    mechanism,
                    display_path(&project.root, &source),
                    display_path(&project.root, &target)
                );
            }
            SyncPlan::Replace {
                source,
                target,
                mechanism,
                existing,
            } => {
                would_sync += 1;
                println!(
                    "[DRY RUN] Would remove existing {existing} at {} and {} {} -> {}",
                    display_path(&project.root, &target),
                    mechanism,
                    display_path(&project.root, &source),
                    display_path(&project.root, &target)
                );
            }
        }
    }

    println!("[DRY RUN] Would sync {would_sync} module(s)");
    Ok(())
}

fn print_summary(synced: &[String], skipped: usize, mechanism: Mechanism) {
    println!();
    println!("Synced {} module(s) via {mechanism}", synced.len());
    if skipped > 0 {
        println!("Skipped {skipped} module(s)");
    }

    if !synced.is_empty() {
        println!();
        println!("{}", Style::new().bold().apply_to("Next steps:"));
        println!("  1. Restart the FamilyHub server processes to load the synced modules");
        println!("  2. Run migrations for the synced modules if they define models");
        println!("  3. Check the result with: familyhub status");
    }
}
