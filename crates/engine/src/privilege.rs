// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Privilege elevation and de-escalation.
//!
//! The installer elevates exactly once: if the process is not already
//! running as root with sudo's identity markers present, it replaces
//! itself with `sudo <self> <argv...>`. The pre-elevation identity (uid,
//! gid, home, cwd) is captured from the markers and stays immutable for
//! the process lifetime. Artifacts created while elevated that the
//! operator must be able to read afterwards get their ownership restored
//! with [`PrivilegeContext::restore_ownership`].

use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use gw_core::StepError;
use nix::unistd::{chown, geteuid, Gid, Uid, User};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrivilegeError {
    /// The elevation mechanism itself failed. Unrecoverable.
    #[error("failed to re-run under sudo: {0}")]
    Elevation(#[source] std::io::Error),

    #[error("original identity unavailable: {0} is not set")]
    MissingMarker(&'static str),

    #[error("invalid identity marker {name}: {value:?}")]
    BadMarker { name: &'static str, value: String },

    #[error("no passwd entry for uid {0}")]
    UnknownUser(u32),

    #[error("could not determine working directory: {0}")]
    Cwd(#[source] std::io::Error),

    #[error("failed to change ownership of {path}: {source}")]
    Chown {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<PrivilegeError> for StepError {
    fn from(e: PrivilegeError) -> Self {
        StepError::Failed(e.to_string())
    }
}

/// Identity of the pre-elevation caller.
#[derive(Debug, Clone)]
pub struct Identity {
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
    pub cwd: PathBuf,
}

impl Identity {
    /// Capture the original identity from the markers the elevation
    /// mechanism left behind.
    fn from_markers() -> Result<Self, PrivilegeError> {
        let uid = read_marker("SUDO_UID")?;
        let gid = read_marker("SUDO_GID")?;
        let user = User::from_uid(Uid::from_raw(uid))
            .ok()
            .flatten()
            .ok_or(PrivilegeError::UnknownUser(uid))?;
        let cwd = std::env::current_dir().map_err(PrivilegeError::Cwd)?;
        Ok(Self {
            uid,
            gid,
            home: user.dir,
            cwd,
        })
    }

    /// Recursively restore ownership of `path` to this identity.
    ///
    /// Directories are walked depth-first, then the path itself is
    /// chowned; a single file is chowned directly.
    pub fn restore_ownership(&self, path: &Path) -> Result<(), PrivilegeError> {
        let uid = Uid::from_raw(self.uid);
        let gid = Gid::from_raw(self.gid);
        walk_ownership(path, &mut |entry| {
            chown(entry, Some(uid), Some(gid)).map_err(|source| PrivilegeError::Chown {
                path: entry.to_path_buf(),
                source,
            })
        })
    }
}

fn read_marker(name: &'static str) -> Result<u32, PrivilegeError> {
    let value = std::env::var(name).map_err(|_| PrivilegeError::MissingMarker(name))?;
    value
        .parse()
        .map_err(|_| PrivilegeError::BadMarker { name, value })
}

/// How the process gets root. The context only depends on this seam, never
/// on a specific elevation tool.
pub trait ElevationGateway {
    /// Already running elevated with identity markers available?
    fn is_elevated(&self) -> bool;

    /// Replace the current process with an elevated re-exec of itself.
    /// Only returns if the replacement failed.
    fn elevate(&self) -> PrivilegeError;
}

/// sudo-backed gateway: euid 0 plus `SUDO_UID` marks elevation; `elevate`
/// execs `sudo <current-exe> <original args>` as a complete replacement.
#[derive(Clone, Copy, Default)]
pub struct SudoGateway;

impl ElevationGateway for SudoGateway {
    fn is_elevated(&self) -> bool {
        geteuid().is_root() && std::env::var_os("SUDO_UID").is_some()
    }

    fn elevate(&self) -> PrivilegeError {
        let exe = match std::env::current_exe() {
            Ok(exe) => exe,
            Err(e) => return PrivilegeError::Elevation(e),
        };
        let err = Command::new("sudo")
            .arg(exe)
            .args(std::env::args_os().skip(1))
            .exec();
        // exec only returns on failure (e.g. sudo missing from PATH).
        PrivilegeError::Elevation(err)
    }
}

/// The elevated/original identity pair for this process.
#[derive(Debug)]
pub struct PrivilegeContext {
    identity: Identity,
}

impl PrivilegeContext {
    /// Ensure the process runs elevated and capture the original identity.
    ///
    /// If the process is not elevated yet this re-execs it through the
    /// gateway and never returns; the `Err` path is reached only when the
    /// elevation mechanism itself is unavailable, which is fatal.
    pub fn ensure_elevated(gateway: &impl ElevationGateway) -> Result<Self, PrivilegeError> {
        if !gateway.is_elevated() {
            tracing::info!("not elevated, re-running under the elevation mechanism");
            return Err(gateway.elevate());
        }
        let identity = Identity::from_markers()?;
        tracing::info!(uid = identity.uid, gid = identity.gid, "captured original identity");
        Ok(Self { identity })
    }

    /// The recorded pre-elevation identity.
    pub fn original(&self) -> &Identity {
        &self.identity
    }

    /// Recursively restore ownership of `path` to the original identity.
    pub fn restore_ownership(&self, path: &Path) -> Result<(), PrivilegeError> {
        self.identity.restore_ownership(path)
    }
}

/// Apply `set_owner` to every entry under `path` (depth-first) and to
/// `path` itself. Split out so tests can count applications without
/// needing root.
///
/// Symlinks are never followed: a symlinked directory is handed to the
/// callback as a single entry, so the walk stays inside the tree and a
/// link cycle cannot recurse.
fn walk_ownership(
    path: &Path,
    set_owner: &mut impl FnMut(&Path) -> Result<(), PrivilegeError>,
) -> Result<(), PrivilegeError> {
    let walk_err = |source| PrivilegeError::Walk {
        path: path.to_path_buf(),
        source,
    };
    let meta = std::fs::symlink_metadata(path).map_err(walk_err)?;
    if meta.is_dir() {
        let entries = std::fs::read_dir(path).map_err(walk_err)?;
        for entry in entries {
            let entry = entry.map_err(walk_err)?;
            // DirEntry::file_type does not traverse the link.
            let file_type = entry.file_type().map_err(walk_err)?;
            let child = entry.path();
            if file_type.is_dir() {
                walk_ownership(&child, set_owner)?;
            } else {
                set_owner(&child)?;
            }
        }
    }
    set_owner(path)
}

#[cfg(test)]
#[path = "privilege_tests.rs"]
mod tests;
