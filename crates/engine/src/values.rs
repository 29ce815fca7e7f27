// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Values document mutation with backup-before-write.
//!
//! The chart's `values.yaml` is the one piece of on-disk state the
//! installer edits rather than overwrites. Every edit snapshots the
//! pre-mutation document to a timestamped sibling (`<path>.<ts>.bak`)
//! before the destructive write begins; backups are append-only and
//! never overwritten.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use gw_core::{deep_merge, StepError};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValuesError {
    #[error("values file not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot read/write values file: {0}")]
    Denied(PathBuf),

    /// Programmer error: an edit with nothing to apply.
    #[error("at least one patch is required")]
    NoPatches,

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ValuesError> for StepError {
    fn from(e: ValuesError) -> Self {
        StepError::Failed(e.to_string())
    }
}

/// Load the document at `path`, verifying read+write access up front.
pub fn load_document(path: &Path) -> Result<Value, ValuesError> {
    if !path.exists() {
        return Err(ValuesError::NotFound(path.to_path_buf()));
    }
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::PermissionDenied => ValuesError::Denied(path.to_path_buf()),
            _ => ValuesError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(|source| ValuesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ValuesError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Snapshot `document` to `<path>.<YYYYMMDDHHMMSS>.bak` and return the
/// backup path.
///
/// The snapshot is flushed to disk before the caller mutates anything, so
/// a crash mid-write still leaves a recoverable prior version. An existing
/// backup is never overwritten: a same-second collision gets a `-<n>`
/// discriminator.
pub fn backup(document: &Value, path: &Path) -> Result<PathBuf, ValuesError> {
    let text = serde_yaml::to_string(document).map_err(ValuesError::Serialize)?;
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S").to_string();

    let mut attempt: u32 = 1;
    loop {
        let candidate = backup_path(path, &stamp, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut file) => {
                let write = file
                    .write_all(text.as_bytes())
                    .and_then(|()| file.sync_all());
                write.map_err(|source| ValuesError::Io {
                    path: candidate.clone(),
                    source,
                })?;
                tracing::info!(backup = %candidate.display(), "wrote values backup");
                return Ok(candidate);
            }
            Err(source) if source.kind() == std::io::ErrorKind::AlreadyExists => {
                attempt += 1;
            }
            Err(source) => {
                return Err(ValuesError::Io {
                    path: candidate,
                    source,
                })
            }
        }
    }
}

fn backup_path(path: &Path, stamp: &str, attempt: u32) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    if attempt == 1 {
        name.push(format!(".{stamp}.bak"));
    } else {
        name.push(format!(".{stamp}-{attempt}.bak"));
    }
    PathBuf::from(name)
}

/// Apply `patches` to `document` in order, left to right. Each patch
/// observes the mutations of the patches before it.
pub fn apply_patches(document: &mut Value, patches: &[Value]) -> Result<(), ValuesError> {
    if patches.is_empty() {
        return Err(ValuesError::NoPatches);
    }
    for patch in patches {
        deep_merge(document, patch);
    }
    Ok(())
}

/// Serialize `document` back to `path`, overwriting it.
pub fn save_document(document: &Value, path: &Path) -> Result<(), ValuesError> {
    let text = serde_yaml::to_string(document).map_err(ValuesError::Serialize)?;
    std::fs::write(path, text).map_err(|source| ValuesError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The one entry point the orchestrator uses: load, backup, patch, save.
/// Returns the backup path.
pub fn edit_document(path: &Path, patches: &[Value]) -> Result<PathBuf, ValuesError> {
    if patches.is_empty() {
        return Err(ValuesError::NoPatches);
    }
    let mut document = load_document(path)?;
    let backup_path = backup(&document, path)?;
    apply_patches(&mut document, patches)?;
    save_document(&document, path)?;
    Ok(backup_path)
}

/// Named default documents, passed into edits instead of living as
/// global state.
pub struct TemplateRegistry {
    templates: HashMap<String, Value>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in `demo` template.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert("demo", demo_template());
        registry
    }

    pub fn insert(&mut self, name: impl Into<String>, document: Value) {
        self.templates.insert(name.into(), document);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.templates.get(name).cloned()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Value {
    let mut m = Mapping::new();
    for (key, value) in entries {
        m.insert(Value::String(key.to_string()), value);
    }
    Value::Mapping(m)
}

/// Single-node demo defaults for the Atlas chart.
fn demo_template() -> Value {
    mapping([(
        "app",
        mapping([
            ("profile", Value::String("demo".to_string())),
            ("service", mapping([("type", Value::String("NodePort".to_string()))])),
            (
                "hostnames",
                mapping([
                    ("backend", Value::String("backend.demo.local".to_string())),
                    ("frontend", Value::String("frontend.demo.local".to_string())),
                ]),
            ),
            ("backend", mapping([("replicaCount", Value::from(1))])),
            ("worker", mapping([("replicaCount", Value::from(1))])),
        ]),
    )])
}

#[cfg(test)]
#[path = "values_tests.rs"]
mod tests;
