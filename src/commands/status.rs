//! Status command implementation
//!
//! Prints the availability table. With `--detailed`, also the paths, the
//! ledger record and whether a copied module still matches its source.

use std::path::PathBuf;

use console::Style;

use crate::availability::{AvailabilityStatus, Status};
use crate::cli::StatusArgs;
use crate::commands::helpers::{Project, display_path, open_project, styled_status, warn_partial, yes_no};
use crate::error::Result;
use crate::hash::hash_directory;
use crate::ledger::{IntegrationLink, SyncLedger};
use crate::syncer::Mechanism;

/// How a copied module compares to the hash recorded at sync time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drift {
    InSync,
    SourceChanged,
    TargetChanged,
    Unknown,
}

impl Drift {
    pub fn describe(self) -> &'static str {
        match self {
            Drift::InSync => "in sync with source",
            Drift::SourceChanged => "source changed since sync; re-run sync",
            Drift::TargetChanged => "integrated copy edited in place",
            Drift::Unknown => "unknown (no hash recorded)",
        }
    }
}

/// Compare a copy against its recorded hash. Symlinks never drift.
pub fn copy_drift(link: &IntegrationLink) -> Drift {
    if link.mechanism == Mechanism::Symlink {
        return Drift::InSync;
    }
    let Some(recorded) = link.hash.as_deref() else {
        return Drift::Unknown;
    };
    match hash_directory(&link.source) {
        Ok(current) if current != recorded => return Drift::SourceChanged,
        Err(_) => return Drift::Unknown,
        Ok(_) => {}
    }
    match hash_directory(&link.target) {
        Ok(current) if current == recorded => Drift::InSync,
        Ok(_) => Drift::TargetChanged,
        Err(_) => Drift::Unknown,
    }
}

/// Counts shown under the full table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub available: usize,
    pub integrated: usize,
    pub standalone_only: usize,
}

impl StatusSummary {
    pub fn from_statuses(statuses: &[AvailabilityStatus]) -> Self {
        let count = |wanted: Status| statuses.iter().filter(|s| s.status == wanted).count();
        Self {
            total: statuses.len(),
            available: statuses.iter().filter(|s| s.available).count(),
            integrated: count(Status::Integrated),
            standalone_only: count(Status::StandaloneOnly),
        }
    }
}

/// Run status command
pub fn run(root: Option<PathBuf>, args: StatusArgs) -> Result<()> {
    let project = open_project(root)?;

    let statuses = match args.module.as_deref() {
        Some(key) => vec![project.registry.status(key)?],
        None => project.registry.scan(),
    };

    print_table(&statuses);
    if args.module.is_none() {
        print_summary(StatusSummary::from_statuses(&statuses));
    }

    if args.detailed {
        let ledger = project.registry.ledger()?;
        for status in &statuses {
            println!();
            print_detailed(&project, &ledger, status);
        }
    }

    let partial: Vec<_> = statuses.iter().filter(|s| s.is_partial()).collect();
    if !partial.is_empty() {
        println!();
        for status in partial {
            warn_partial(status);
        }
    }

    Ok(())
}

fn print_table(statuses: &[AvailabilityStatus]) {
    let header = Style::new().bold();
    println!(
        "{}",
        header.apply_to(format!(
            "{:<20} {:<16} {:<8} {:<10} {}",
            "MODULE", "STATUS", "MODE", "AVAILABLE", "URLS"
        ))
    );
    for status in statuses {
        println!(
            "{:<20} {} {:<8} {:<10} {}",
            status.key,
            styled_status(status.status, 16),
            status.mode().as_str(),
            yes_no(status.available),
            yes_no(status.urls_available)
        );
    }
}

fn print_summary(summary: StatusSummary) {
    println!();
    println!(
        "Total: {}  Available: {}  Integrated: {}  Standalone only: {}",
        summary.total, summary.available, summary.integrated, summary.standalone_only
    );
}

fn print_detailed(project: &Project, ledger: &SyncLedger, status: &AvailabilityStatus) {
    let label = Style::new().bold();
    println!("{}", Style::new().bold().yellow().apply_to(&status.key));
    println!(
        "  {} {} ({})",
        label.apply_to("Standalone:"),
        display_path(&project.root, &status.standalone_path),
        if status.standalone_exists { "present" } else { "missing" }
    );
    println!(
        "  {} {} ({})",
        label.apply_to("Integrated:"),
        display_path(&project.root, &status.integrated_path),
        if status.integrated_exists {
            status.mode().as_str()
        } else {
            "missing"
        }
    );

    match ledger.get(&status.key) {
        Some(link) => {
            println!("  {} {}", label.apply_to("Synced via:"), link.mechanism);
            if link.mechanism == Mechanism::Copy {
                println!("  {} {}", label.apply_to("Drift:"), copy_drift(link).describe());
            }
        }
        None => println!("  {} not recorded", label.apply_to("Synced via:")),
    }
}
