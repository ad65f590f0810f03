use std::cell::Cell;
use std::fs;
use std::io;
use std::path::Path;

use super::*;
use crate::availability::{Resolver, Status};
use crate::linker::FsLinker;
use crate::test_fixtures::{create_hub, write_real_module};

/// Refuses symbolic links the way an unprivileged Windows account does
struct DenySymlinks {
    copies: Cell<usize>,
}

impl DenySymlinks {
    fn new() -> Self {
        Self {
            copies: Cell::new(0),
        }
    }
}

impl Linker for DenySymlinks {
    fn symlink_dir(&self, _source: &Path, _target: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "a required privilege is not held by the client",
        ))
    }

    fn copy_tree(&self, source: &Path, target: &Path) -> io::Result<()> {
        self.copies.set(self.copies.get() + 1);
        FsLinker.copy_tree(source, target)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        FsLinker.rename(from, to)
    }

    fn remove(&self, target: &Path) -> io::Result<()> {
        FsLinker.remove(target)
    }

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        FsLinker.ensure_dir(dir)
    }
}

/// Writes part of the tree, then fails like a full disk
struct FailMidCopy;

impl Linker for FailMidCopy {
    fn symlink_dir(&self, source: &Path, target: &Path) -> io::Result<()> {
        FsLinker.symlink_dir(source, target)
    }

    fn copy_tree(&self, _source: &Path, target: &Path) -> io::Result<()> {
        fs::create_dir_all(target)?;
        fs::write(target.join("__init__.py"), "")?;
        Err(io::Error::other("no space left on device"))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        FsLinker.rename(from, to)
    }

    fn remove(&self, target: &Path) -> io::Result<()> {
        FsLinker.remove(target)
    }

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        FsLinker.ensure_dir(dir)
    }
}

/// Deletes one file of a tree, then fails like a locked file
struct PartialRemove;

impl Linker for PartialRemove {
    fn symlink_dir(&self, source: &Path, target: &Path) -> io::Result<()> {
        FsLinker.symlink_dir(source, target)
    }

    fn copy_tree(&self, source: &Path, target: &Path) -> io::Result<()> {
        FsLinker.copy_tree(source, target)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        FsLinker.rename(from, to)
    }

    fn remove(&self, target: &Path) -> io::Result<()> {
        if fs::symlink_metadata(target).is_err() {
            return Ok(());
        }
        let _ = fs::remove_file(target.join("models.py"));
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }

    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        FsLinker.ensure_dir(dir)
    }
}

fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(dir).unwrap().to_string_lossy().to_string();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}

fn apps_entries(layout: &HubLayout) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(layout.apps_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_copy_sync_materializes_module() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(syncer.sync("timesheet", Mechanism::Copy));

    let target = layout.integrated_path(module);
    assert!(target.is_dir());
    assert!(!fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
    assert_eq!(snapshot(&target), snapshot(&layout.standalone_path(module)));

    let status = Resolver::new(&layout).resolve(module);
    assert_eq!(status.status, Status::Integrated);
    assert!(status.urls_available);
}

#[cfg(unix)]
#[test]
fn test_symlink_sync_points_at_source() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    let source = layout.standalone_path(module);
    write_real_module(&source, true);

    let syncer = Syncer::new(&catalog, &layout);
    let link = syncer.try_sync("timesheet", Mechanism::Symlink).unwrap();

    let target = layout.integrated_path(module);
    assert!(fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
    assert_eq!(
        dunce::canonicalize(&target).unwrap(),
        dunce::canonicalize(&source).unwrap()
    );
    assert_eq!(link.mechanism, Mechanism::Symlink);
    assert!(link.hash.is_none());
}

#[test]
fn test_sync_twice_is_idempotent() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("household_budget").unwrap();
    write_real_module(&layout.standalone_path(module), false);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(syncer.sync("household_budget", Mechanism::Copy));
    let first_tree = snapshot(&layout.integrated_path(module));
    let first_ledger = fs::read_to_string(layout.ledger_path()).unwrap();
    let first_entries = apps_entries(&layout);

    assert!(syncer.sync("household_budget", Mechanism::Copy));
    assert_eq!(snapshot(&layout.integrated_path(module)), first_tree);
    assert_eq!(fs::read_to_string(layout.ledger_path()).unwrap(), first_ledger);
    assert_eq!(apps_entries(&layout), first_entries);
}

#[cfg(unix)]
#[test]
fn test_symlink_sync_twice_is_idempotent() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(syncer.sync("timesheet", Mechanism::Symlink));
    assert!(syncer.sync("timesheet", Mechanism::Symlink));
    assert_eq!(apps_entries(&layout), vec!["timesheet_app"]);
}

#[test]
fn test_missing_source_fails_without_mutation() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();

    // A hand-made target must survive a sync that cannot run
    let target = layout.integrated_path(module);
    write_real_module(&target, true);
    let before = snapshot(&target);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(!syncer.sync("timesheet", Mechanism::Copy));
    assert!(matches!(
        syncer.try_sync("timesheet", Mechanism::Symlink),
        Err(SyncFailure::MissingSource { .. })
    ));

    assert_eq!(snapshot(&target), before);
    assert!(!layout.ledger_path().exists());
}

#[test]
fn test_missing_source_creates_nothing() {
    let (temp, _) = create_hub();
    let layout = crate::config::HubConfig::default().layout(&temp.path().join("fresh"));
    let catalog = Catalog::builtin();

    assert!(!Syncer::new(&catalog, &layout).sync("timesheet", Mechanism::Copy));
    assert!(!layout.root().exists());
}

#[test]
fn test_unknown_module_fails() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let syncer = Syncer::new(&catalog, &layout);

    assert!(!syncer.sync("garden", Mechanism::Copy));
    assert!(matches!(
        syncer.try_sync("garden", Mechanism::Copy),
        Err(SyncFailure::UnknownModule { .. })
    ));
}

#[cfg(unix)]
#[test]
fn test_copy_replaces_stale_symlink() {
    let (temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    let source = layout.standalone_path(module);
    write_real_module(&source, true);

    let target = layout.integrated_path(module);
    std::os::unix::fs::symlink(temp.path().join("old-checkout"), &target).unwrap();

    assert!(Syncer::new(&catalog, &layout).sync("timesheet", Mechanism::Copy));

    let meta = fs::symlink_metadata(&target).unwrap();
    assert!(!meta.file_type().is_symlink());
    assert!(meta.is_dir());
    assert_eq!(snapshot(&target), snapshot(&source));
}

#[test]
fn test_denied_symlink_fails_without_fallback() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    let linker = DenySymlinks::new();
    let syncer = Syncer::with_linker(&catalog, &layout, linker);
    let failure = syncer.try_sync("timesheet", Mechanism::Symlink).unwrap_err();

    assert!(failure.is_link_denied());
    assert_eq!(syncer.linker.copies.get(), 0);
    assert!(fs::symlink_metadata(layout.integrated_path(module)).is_err());
    assert!(!layout.ledger_path().exists());
}

#[test]
fn test_denied_symlink_after_existing_copy_leaves_target_absent() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    assert!(Syncer::new(&catalog, &layout).sync("timesheet", Mechanism::Copy));
    assert!(
        !Syncer::with_linker(&catalog, &layout, DenySymlinks::new())
            .sync("timesheet", Mechanism::Symlink)
    );

    assert!(fs::symlink_metadata(layout.integrated_path(module)).is_err());
    let ledger = SyncLedger::load(&layout.ledger_path()).unwrap();
    assert!(ledger.get("timesheet").is_none());
}

#[test]
fn test_failed_copy_leaves_no_partial_tree() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    let syncer = Syncer::with_linker(&catalog, &layout, FailMidCopy);
    assert!(matches!(
        syncer.try_sync("timesheet", Mechanism::Copy),
        Err(SyncFailure::CopyFailed { .. })
    ));

    assert!(fs::symlink_metadata(layout.integrated_path(module)).is_err());
    assert!(apps_entries(&layout).is_empty(), "staging directory left behind");
}

#[test]
fn test_stale_staging_directory_is_replaced() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    let stale = layout.apps_dir().join(".timesheet_app.partial");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("junk.txt"), "junk").unwrap();

    assert!(Syncer::new(&catalog, &layout).sync("timesheet", Mechanism::Copy));
    assert!(!stale.exists());
    assert!(!layout.integrated_path(module).join("junk.txt").exists());
}

#[test]
fn test_empty_source_fails_and_leaves_target_absent() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    fs::create_dir_all(layout.standalone_path(module)).unwrap();

    let syncer = Syncer::new(&catalog, &layout);
    assert!(matches!(
        syncer.try_sync("timesheet", Mechanism::Copy),
        Err(SyncFailure::EmptyTarget { .. })
    ));
    assert!(fs::symlink_metadata(layout.integrated_path(module)).is_err());
}

#[test]
fn test_copy_records_hash_in_ledger() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    Syncer::new(&catalog, &layout)
        .try_sync("timesheet", Mechanism::Copy)
        .unwrap();

    let ledger = SyncLedger::load(&layout.ledger_path()).unwrap();
    let link = ledger.get("timesheet").unwrap();
    assert_eq!(link.mechanism, Mechanism::Copy);
    assert_eq!(link.target, layout.integrated_path(module));
    assert_eq!(
        link.hash.as_deref(),
        Some(hash_directory(&layout.standalone_path(module)).unwrap().as_str())
    );
}

#[test]
fn test_plan_is_read_only() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    let plan = Syncer::new(&catalog, &layout)
        .plan("timesheet", Mechanism::Copy, false)
        .unwrap();

    assert!(matches!(plan, SyncPlan::Create { .. }));
    assert!(plan.will_mutate());
    assert!(apps_entries(&layout).is_empty());
    assert!(!layout.ledger_path().exists());
}

#[test]
fn test_plan_blocks_foreign_target_without_force() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);
    write_real_module(&layout.integrated_path(module), true);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(matches!(
        syncer.plan("timesheet", Mechanism::Copy, false).unwrap(),
        SyncPlan::Blocked { .. }
    ));
    assert!(matches!(
        syncer.plan("timesheet", Mechanism::Copy, true).unwrap(),
        SyncPlan::Replace { .. }
    ));
}

#[test]
fn test_plan_allows_replacing_own_target() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(syncer.sync("timesheet", Mechanism::Copy));

    let plan = syncer.plan("timesheet", Mechanism::Copy, false).unwrap();
    assert!(matches!(
        plan,
        SyncPlan::Replace {
            existing: LinkMode::Copy,
            ..
        }
    ));
}

#[test]
fn test_plan_missing_source() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();

    let plan = Syncer::new(&catalog, &layout)
        .plan("timesheet", Mechanism::Symlink, true)
        .unwrap();
    assert!(matches!(plan, SyncPlan::MissingSource { .. }));
    assert!(!plan.will_mutate());
}

#[test]
fn test_plan_unknown_module_is_error() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    assert!(
        Syncer::new(&catalog, &layout)
            .plan("garden", Mechanism::Copy, false)
            .is_err()
    );
}

#[test]
fn test_unsync_removes_target_and_ledger_entry() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    let source = layout.standalone_path(module);
    write_real_module(&source, true);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(syncer.sync("timesheet", Mechanism::Copy));
    assert!(matches!(
        syncer.plan_unsync("timesheet", false).unwrap(),
        UnsyncPlan::Remove { .. }
    ));

    syncer.unsync("timesheet").unwrap();

    assert!(fs::symlink_metadata(layout.integrated_path(module)).is_err());
    assert!(source.join("models.py").exists());
    assert!(SyncLedger::load(&layout.ledger_path()).unwrap().get("timesheet").is_none());
    assert_eq!(
        syncer.plan_unsync("timesheet", false).unwrap(),
        UnsyncPlan::NothingToRemove
    );
}

#[test]
fn test_plan_unsync_blocks_foreign_target() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.integrated_path(module), true);

    let syncer = Syncer::new(&catalog, &layout);
    assert!(matches!(
        syncer.plan_unsync("timesheet", false).unwrap(),
        UnsyncPlan::Blocked { .. }
    ));
    assert!(matches!(
        syncer.plan_unsync("timesheet", true).unwrap(),
        UnsyncPlan::Remove { .. }
    ));
}

#[test]
fn test_failed_removal_never_leaves_half_removed_target() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    let source = layout.standalone_path(module);
    write_real_module(&source, true);
    assert!(Syncer::new(&catalog, &layout).sync("timesheet", Mechanism::Copy));

    let syncer = Syncer::with_linker(&catalog, &layout, PartialRemove);
    assert!(syncer.sync("timesheet", Mechanism::Copy));

    let target = layout.integrated_path(module);
    assert_eq!(snapshot(&target), snapshot(&source));
    assert_eq!(
        Resolver::new(&layout).resolve(module).status,
        Status::Integrated
    );
    // The half-deleted tree stays aside, out of the import path
    let removing = layout.apps_dir().join(".timesheet_app.removing");
    assert!(removing.is_dir());
    assert!(!removing.join("models.py").exists());
}

#[test]
fn test_failed_removal_on_unsync_clears_target() {
    let (_temp, layout) = create_hub();
    let catalog = Catalog::builtin();
    let module = catalog.require("timesheet").unwrap();
    write_real_module(&layout.standalone_path(module), true);
    assert!(Syncer::new(&catalog, &layout).sync("timesheet", Mechanism::Copy));

    Syncer::with_linker(&catalog, &layout, PartialRemove)
        .unsync("timesheet")
        .unwrap();
    assert!(fs::symlink_metadata(layout.integrated_path(module)).is_err());

    // The next sync clears the debris
    assert!(Syncer::new(&catalog, &layout).sync("timesheet", Mechanism::Copy));
    assert_eq!(apps_entries(&layout), vec!["timesheet_app"]);
}
