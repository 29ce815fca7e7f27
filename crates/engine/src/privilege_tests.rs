// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

use super::*;
use serial_test::serial;
use std::cell::Cell;

/// Gateway that never execs; reports a configurable elevation state.
struct FakeGateway {
    elevated: bool,
    elevate_calls: Cell<u32>,
}

impl FakeGateway {
    fn new(elevated: bool) -> Self {
        Self {
            elevated,
            elevate_calls: Cell::new(0),
        }
    }
}

impl ElevationGateway for FakeGateway {
    fn is_elevated(&self) -> bool {
        self.elevated
    }

    fn elevate(&self) -> PrivilegeError {
        self.elevate_calls.set(self.elevate_calls.get() + 1);
        PrivilegeError::Elevation(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "sudo: command not found",
        ))
    }
}

#[test]
fn unelevated_process_goes_through_the_gateway() {
    let gateway = FakeGateway::new(false);
    let err = PrivilegeContext::ensure_elevated(&gateway).unwrap_err();
    assert_eq!(gateway.elevate_calls.get(), 1);
    assert!(matches!(err, PrivilegeError::Elevation(_)));
}

#[test]
#[serial]
fn missing_markers_fail_even_when_elevated() {
    std::env::remove_var("SUDO_UID");
    std::env::remove_var("SUDO_GID");
    let gateway = FakeGateway::new(true);
    let err = PrivilegeContext::ensure_elevated(&gateway).unwrap_err();
    assert!(matches!(err, PrivilegeError::MissingMarker("SUDO_UID")));
}

#[test]
#[serial]
fn garbage_markers_are_rejected() {
    std::env::set_var("SUDO_UID", "not-a-uid");
    std::env::set_var("SUDO_GID", "0");
    let gateway = FakeGateway::new(true);
    let err = PrivilegeContext::ensure_elevated(&gateway).unwrap_err();
    std::env::remove_var("SUDO_UID");
    std::env::remove_var("SUDO_GID");
    assert!(matches!(err, PrivilegeError::BadMarker { name: "SUDO_UID", .. }));
}

#[test]
#[serial]
fn identity_is_captured_from_markers() {
    std::env::set_var("SUDO_UID", "0");
    std::env::set_var("SUDO_GID", "0");
    let gateway = FakeGateway::new(true);
    let ctx = PrivilegeContext::ensure_elevated(&gateway).unwrap();
    std::env::remove_var("SUDO_UID");
    std::env::remove_var("SUDO_GID");
    let identity = ctx.original();
    assert_eq!(identity.uid, 0);
    assert_eq!(identity.gid, 0);
    assert!(identity.home.is_absolute());
    assert!(identity.cwd.is_absolute());
}

#[test]
fn ownership_walk_visits_every_entry_and_the_root() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let dir = root.join("dir");
    let subdir = dir.join("subdir");
    std::fs::create_dir_all(&subdir).unwrap();
    std::fs::write(root.join("file1"), b"a").unwrap();
    std::fs::write(root.join("file2"), b"b").unwrap();

    let mut visited = Vec::new();
    walk_ownership(root, &mut |p| {
        visited.push(p.to_path_buf());
        Ok(())
    })
    .unwrap();

    // dir, subdir, file1, file2, plus the root itself.
    assert_eq!(visited.len(), 5);
    assert_eq!(visited.last().unwrap(), root, "root is chowned last");
    for expected in [&dir, &subdir, &root.join("file1"), &root.join("file2")] {
        assert!(visited.contains(expected), "missing {expected:?}");
    }
    // Depth-first: subdir before its parent dir.
    let sub_at = visited.iter().position(|p| p == &subdir).unwrap();
    let dir_at = visited.iter().position(|p| p == &dir).unwrap();
    assert!(sub_at < dir_at);
}

#[test]
fn ownership_walk_treats_directory_symlinks_as_single_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    std::fs::write(elsewhere.path().join("outside"), b"x").unwrap();

    let root = tmp.path();
    std::fs::write(root.join("file"), b"a").unwrap();
    let link = root.join("link");
    std::os::unix::fs::symlink(elsewhere.path(), &link).unwrap();
    // A link back into the tree must not recurse.
    let cycle = root.join("cycle");
    std::os::unix::fs::symlink(root, &cycle).unwrap();

    let mut visited = Vec::new();
    walk_ownership(root, &mut |p| {
        visited.push(p.to_path_buf());
        Ok(())
    })
    .unwrap();

    // file, both link entries, plus the root. Nothing behind the links.
    assert_eq!(visited.len(), 4);
    assert!(visited.contains(&link));
    assert!(visited.contains(&cycle));
    assert!(!visited.iter().any(|p| p.ends_with("outside")));
}

#[test]
fn ownership_walk_tolerates_a_single_file() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("only");
    std::fs::write(&file, b"x").unwrap();

    let mut visited = Vec::new();
    walk_ownership(&file, &mut |p| {
        visited.push(p.to_path_buf());
        Ok(())
    })
    .unwrap();
    assert_eq!(visited, vec![file]);
}

#[test]
fn ownership_walk_propagates_the_first_failure() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("file"), b"x").unwrap();

    let err = walk_ownership(tmp.path(), &mut |p| {
        Err(PrivilegeError::Chown {
            path: p.to_path_buf(),
            source: nix::Error::EPERM,
        })
    })
    .unwrap_err();
    assert!(matches!(err, PrivilegeError::Chown { .. }));
}
