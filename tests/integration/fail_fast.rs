//! Failure handling: scans fail whole, execution stops at the first failed action

use super::test_utils::{read_tree, temp_pair, write_tree};
use hashsync::sync::{Executor, ExecutorOptions, SyncOptions, Synchronizer};
use hashsync::{sync, Action, Operation, SyncError, WalkerConfig};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_missing_source_root_fails_before_touching_dest() {
    let (source, dest) = temp_pair();
    write_tree(dest.path(), &[("keep.txt", b"keep")]);
    let missing = source.path().join("does-not-exist");

    let err = sync(&missing, dest.path()).unwrap_err();

    assert!(matches!(err, SyncError::RootNotFound(_)));
    assert_eq!(read_tree(dest.path()).len(), 1);
}

#[test]
fn test_file_as_root_is_rejected() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("file.txt", b"x")]);

    let err = sync(&source.path().join("file.txt"), dest.path()).unwrap_err();

    assert!(matches!(err, SyncError::NotADirectory(_)));
}

#[test]
fn test_nested_roots_are_rejected() {
    let (source, _dest) = temp_pair();
    write_tree(source.path(), &[("inner/a.txt", b"a")]);

    let err = sync(source.path(), &source.path().join("inner")).unwrap_err();
    assert!(matches!(err, SyncError::OverlappingRoots { .. }));

    let err = sync(&source.path().join("inner"), source.path()).unwrap_err();
    assert!(matches!(err, SyncError::OverlappingRoots { .. }));
}

fn ignoring_git() -> Synchronizer {
    Synchronizer::new(SyncOptions {
        walker: WalkerConfig {
            ignore_patterns: vec![".git".to_string()],
            ..WalkerConfig::default()
        },
        ..SyncOptions::default()
    })
}

#[test]
fn test_failed_action_stops_remaining_actions() {
    let (source, dest) = temp_pair();
    // The scan cannot see the ignored file that keeps `blocker` non-empty
    write_tree(source.path(), &[("blocker", b"file")]);
    write_tree(
        dest.path(),
        &[("blocker/.git/HEAD", b"ref"), ("stale.txt", b"stale")],
    );

    let err = ignoring_git()
        .sync(source.path(), dest.path())
        .unwrap_err();

    match err {
        SyncError::ActionFailed {
            index,
            ref action,
            ref source,
        } => {
            assert_eq!(index, 0);
            assert!(matches!(action, Action::Copy { .. }));
            assert_eq!(source.operation(), Some(Operation::Copy));
        }
        other => panic!("expected ActionFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("Action #0 failed"));

    // The delete planned after the failed copy never ran
    assert_eq!(fs::read(dest.path().join("stale.txt")).unwrap(), b"stale");
    assert!(dest.path().join("blocker/.git/HEAD").exists());
}

#[test]
fn test_vanished_path_reports_offending_action() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a.txt", b"a")]);
    write_tree(dest.path(), &[("b.txt", b"b")]);

    let synchronizer = Synchronizer::new(SyncOptions::default());
    let plan = synchronizer.plan(source.path(), dest.path()).unwrap();
    assert_eq!(plan.actions.len(), 2);

    // Remove the copy origin between planning and execution
    fs::remove_file(source.path().join("a.txt")).unwrap();

    let err = Executor::new(ExecutorOptions::default())
        .execute(&plan.actions)
        .unwrap_err();

    match err {
        SyncError::ActionFailed { index, source, .. } => {
            assert_eq!(index, 0);
            assert!(matches!(*source, SyncError::NotFound { .. }));
            assert_eq!(
                source.path().map(PathBuf::from),
                Some(plan.source.root().join("a.txt"))
            );
        }
        other => panic!("expected ActionFailed, got {other:?}"),
    }
    assert!(dest.path().join("b.txt").exists());
}

#[test]
fn test_rerun_after_fixing_failure_converges() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("blocker", b"file"), ("z.txt", b"z")]);
    write_tree(dest.path(), &[("blocker/.git/HEAD", b"ref")]);

    let synchronizer = ignoring_git();
    assert!(synchronizer.sync(source.path(), dest.path()).is_err());

    fs::remove_dir_all(dest.path().join("blocker")).unwrap();
    synchronizer.sync(source.path(), dest.path()).unwrap();

    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
    assert!(synchronizer
        .sync(source.path(), dest.path())
        .unwrap()
        .was_converged());
}

#[cfg(unix)]
#[test]
fn test_dest_symlink_into_source_is_replaced_not_written_through() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("b.txt", b"new"), ("secret.txt", b"original")]);
    std::os::unix::fs::symlink(source.path().join("secret.txt"), dest.path().join("b.txt"))
        .unwrap();

    sync(source.path(), dest.path()).unwrap();

    assert_eq!(
        fs::read(source.path().join("secret.txt")).unwrap(),
        b"original"
    );
    let meta = fs::symlink_metadata(dest.path().join("b.txt")).unwrap();
    assert!(meta.file_type().is_file());
    assert_eq!(fs::read(dest.path().join("b.txt")).unwrap(), b"new");
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[cfg(unix)]
#[test]
fn test_dest_symlinked_directory_is_refused() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("dir/x.txt", b"x"), ("sub/keep.txt", b"keep")]);
    std::os::unix::fs::symlink(source.path().join("sub"), dest.path().join("dir")).unwrap();

    let err = sync(source.path(), dest.path()).unwrap_err();

    match err {
        SyncError::ActionFailed { source: cause, .. } => {
            assert!(matches!(*cause, SyncError::SymlinkInPath(_)));
        }
        other => panic!("expected ActionFailed, got {other:?}"),
    }
    assert!(!source.path().join("sub/x.txt").exists());
    assert_eq!(
        fs::read(source.path().join("sub/keep.txt")).unwrap(),
        b"keep"
    );
}
