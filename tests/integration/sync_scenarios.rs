//! End-to-end sync scenarios against real temp directories

use super::test_utils::{read_tree, temp_pair, write_tree};
use hashsync::sync::{ExecutorOptions, SyncOptions, Synchronizer};
use hashsync::{sync, Action, ActionCounts};
use std::fs;

#[test]
fn test_copies_into_empty_destination() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a.txt", b"alpha"), ("b.txt", b"beta")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts.copied, 2);
    assert_eq!(result.counts.moved, 0);
    assert_eq!(result.counts.deleted, 0);
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[test]
fn test_renamed_content_is_moved_not_copied() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("new-name.txt", b"payload")]);
    write_tree(dest.path(), &[("old-name.txt", b"payload")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts, ActionCounts { copied: 0, moved: 1, deleted: 0 });
    assert!(matches!(result.actions[0], Action::Move { .. }));
    assert!(!dest.path().join("old-name.txt").exists());
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[test]
fn test_content_missing_from_source_is_deleted() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("keep.txt", b"keep")]);
    write_tree(dest.path(), &[("keep.txt", b"keep"), ("stale.txt", b"stale")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts, ActionCounts { copied: 0, moved: 0, deleted: 1 });
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[test]
fn test_second_sync_plans_nothing() {
    let (source, dest) = temp_pair();
    write_tree(
        source.path(),
        &[("a.txt", b"one"), ("b.txt", b"two"), ("nested/c.txt", b"three")],
    );
    write_tree(dest.path(), &[("x.txt", b"two"), ("a.txt", b"old"), ("junk", b"junk")]);

    let first = sync(source.path(), dest.path()).unwrap();
    assert!(!first.was_converged());

    let second = sync(source.path(), dest.path()).unwrap();
    assert!(second.was_converged());
    assert!(second.actions.is_empty());
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[test]
fn test_source_is_never_modified() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a.txt", b"alpha"), ("sub/b.txt", b"beta")]);
    write_tree(dest.path(), &[("b.txt", b"alpha"), ("gone.txt", b"gone")]);
    let before = read_tree(source.path());

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(read_tree(source.path()), before);
    let canonical_source = dunce::canonicalize(source.path()).unwrap();
    for action in &result.actions {
        assert!(!action.target().starts_with(&canonical_source));
    }
}

#[test]
fn test_duplicate_source_content_collapses_to_one_file() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a.txt", b"same"), ("b.txt", b"same")]);

    let first = sync(source.path(), dest.path()).unwrap();
    assert_eq!(first.source_identities, 1);
    assert_eq!(first.counts.copied, 1);

    // Walk order is sorted by name, so the later name holds the content
    let mirrored = read_tree(dest.path());
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored.get("b.txt").map(Vec::as_slice), Some(&b"same"[..]));

    let second = sync(source.path(), dest.path()).unwrap();
    assert!(second.was_converged());
}

#[test]
fn test_nested_directories_are_recreated() {
    let (source, dest) = temp_pair();
    write_tree(
        source.path(),
        &[("photos/2024/a.jpg", b"jpeg-a"), ("photos/2024/b.jpg", b"jpeg-b"), ("docs/readme", b"hi")],
    );

    sync(source.path(), dest.path()).unwrap();

    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[test]
fn test_moves_between_directories() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("archive/2023/report.pdf", b"report")]);
    write_tree(dest.path(), &[("inbox/report.pdf", b"report")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts, ActionCounts { copied: 0, moved: 1, deleted: 0 });
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[test]
fn test_swapped_names_converge_without_copying() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a.txt", b"first"), ("b.txt", b"second")]);
    write_tree(dest.path(), &[("a.txt", b"second"), ("b.txt", b"first")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts.copied, 0);
    assert_eq!(result.counts.deleted, 0);
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
    assert!(sync(source.path(), dest.path()).unwrap().was_converged());
}

#[test]
fn test_rotated_names_converge() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("1", b"a"), ("2", b"b"), ("3", b"c")]);
    write_tree(dest.path(), &[("1", b"c"), ("2", b"a"), ("3", b"b")]);

    sync(source.path(), dest.path()).unwrap();

    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[test]
fn test_stale_content_under_same_name_is_replaced() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("notes.txt", b"version 2")]);
    write_tree(dest.path(), &[("notes.txt", b"version 1")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts.copied, 1);
    assert_eq!(
        fs::read(dest.path().join("notes.txt")).unwrap(),
        b"version 2"
    );
    assert!(sync(source.path(), dest.path()).unwrap().was_converged());
}

#[test]
fn test_empty_source_empties_destination() {
    let (source, dest) = temp_pair();
    write_tree(dest.path(), &[("a", b"a"), ("deep/b", b"b")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts.deleted, 2);
    assert!(read_tree(dest.path()).is_empty());
}

#[test]
fn test_dry_run_reports_without_applying() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a.txt", b"alpha")]);
    write_tree(dest.path(), &[("old.txt", b"old")]);
    let before = read_tree(dest.path());

    let synchronizer = Synchronizer::new(SyncOptions {
        executor: ExecutorOptions {
            dry_run: true,
            ..ExecutorOptions::default()
        },
        ..SyncOptions::default()
    });
    let result = synchronizer.sync(source.path(), dest.path()).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.counts, ActionCounts { copied: 1, moved: 0, deleted: 1 });
    assert_eq!(read_tree(dest.path()), before);
}

#[test]
fn test_plan_matches_executed_actions() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a", b"1"), ("b", b"2")]);
    write_tree(dest.path(), &[("c", b"2"), ("d", b"4")]);

    let synchronizer = Synchronizer::default();
    let plan = synchronizer.plan(source.path(), dest.path()).unwrap();
    let result = synchronizer.sync(source.path(), dest.path()).unwrap();

    assert_eq!(plan.actions, result.actions);
}

#[test]
fn test_blake3_sync_converges() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a", b"alpha"), ("b", b"beta")]);
    write_tree(dest.path(), &[("renamed", b"alpha")]);

    let synchronizer = Synchronizer::new(SyncOptions {
        algorithm: hashsync::DigestAlgorithm::Blake3,
        ..SyncOptions::default()
    });
    synchronizer.sync(source.path(), dest.path()).unwrap();

    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
    assert!(synchronizer
        .sync(source.path(), dest.path())
        .unwrap()
        .was_converged());
}

#[test]
fn test_file_vacated_by_move_becomes_directory() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("b", b"first"), ("a/c", b"second")]);
    write_tree(dest.path(), &[("a", b"first")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts, ActionCounts { copied: 1, moved: 1, deleted: 0 });
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
    assert!(sync(source.path(), dest.path()).unwrap().was_converged());
}

#[test]
fn test_stale_file_where_directory_is_needed() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a/c", b"new")]);
    write_tree(dest.path(), &[("a", b"old")]);

    sync(source.path(), dest.path()).unwrap();

    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
    assert!(sync(source.path(), dest.path()).unwrap().was_converged());
}

#[test]
fn test_stale_directory_where_file_is_needed() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a", b"new")]);
    write_tree(dest.path(), &[("a/x", b"old"), ("a/deeper/y", b"older")]);

    sync(source.path(), dest.path()).unwrap();

    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
    assert!(dest.path().join("a").is_file());
    assert!(sync(source.path(), dest.path()).unwrap().was_converged());
}

#[test]
fn test_file_moves_into_directory_of_its_own_name() {
    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("a/c", b"payload")]);
    write_tree(dest.path(), &[("a", b"payload")]);

    let result = sync(source.path(), dest.path()).unwrap();

    assert_eq!(result.counts, ActionCounts { copied: 0, moved: 2, deleted: 0 });
    assert_eq!(read_tree(dest.path()), read_tree(source.path()));
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_are_left_alone_on_both_sides() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (source, dest) = temp_pair();
    write_tree(source.path(), &[("plain.txt", b"plain")]);
    fs::write(source.path().join(OsStr::from_bytes(b"\xffsource")), b"unlisted").unwrap();
    fs::write(dest.path().join(OsStr::from_bytes(b"\xffdest")), b"kept").unwrap();

    let first = sync(source.path(), dest.path()).unwrap();
    assert_eq!(first.counts, ActionCounts { copied: 1, moved: 0, deleted: 0 });

    assert!(!dest.path().join(OsStr::from_bytes(b"\xffsource")).exists());
    assert_eq!(
        fs::read(dest.path().join(OsStr::from_bytes(b"\xffdest"))).unwrap(),
        b"kept"
    );
    assert!(sync(source.path(), dest.path()).unwrap().was_converged());
}
