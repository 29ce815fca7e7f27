// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Recursive merge of configuration patches into a YAML document.
//!
//! Merge rules: a mapping value merges key-by-key into the existing
//! mapping (created if absent); lists and scalars replace the existing
//! value wholesale. Keys absent from the patch are left untouched.

use serde_yaml::{Mapping, Value};

/// Merge `patch` into `target`, key by key.
pub fn merge_mappings(target: &mut Mapping, patch: &Mapping) {
    for (key, value) in patch {
        match (target.get_mut(key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(nested)) => {
                merge_mappings(existing, nested);
            }
            // Existing value is a scalar, list, or absent: replace wholesale.
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merge `patch` into `target` at the document level.
///
/// When both sides are mappings the merge recurses; any other
/// combination replaces the target document outright.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Mapping(t), Value::Mapping(p)) => merge_mappings(t, p),
        (t, p) => *t = p.clone(),
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
