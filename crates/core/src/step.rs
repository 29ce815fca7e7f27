// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Install steps: one unit of the bootstrap pipeline.
//!
//! A step pairs a human-readable description with an action, either a
//! shell command string or a callback that touches the host directly.
//! The two forms are an explicit tagged variant so dispatch never relies
//! on runtime type inspection.

use std::fmt;

use thiserror::Error;

/// What a successful step produces: captured shell output, or whatever
/// the callback chose to return (a path, an address, nothing).
pub type StepOutput = Option<String>;

/// Callback form of a step action. Runs once, may fail.
pub type StepFn = Box<dyn FnMut() -> Result<StepOutput, StepError>>;

/// Errors raised while running a step.
#[derive(Debug, Error)]
pub enum StepError {
    /// Shell action exited non-zero. `output` is the captured
    /// combined stdout/stderr, kept whole so the operator can diagnose.
    #[error("`{description}` failed: {output}")]
    Shell { description: String, output: String },

    /// The command interpreter could not be started at all.
    #[error("`{description}` could not start: {source}")]
    Spawn {
        description: String,
        #[source]
        source: std::io::Error,
    },

    /// A callback action failed; carries the callback's own detail.
    #[error("{0}")]
    Failed(String),
}

/// The action behind a step.
pub enum StepAction {
    /// A command line executed through `sh -c`.
    Shell(String),
    /// A callback invoked directly.
    Call(StepFn),
}

impl fmt::Debug for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Shell(cmd) => f.debug_tuple("Shell").field(cmd).finish(),
            StepAction::Call(_) => f.debug_tuple("Call").field(&"<fn>").finish(),
        }
    }
}

/// One unit of the install pipeline.
///
/// Steps are immutable once constructed and consumed by execution.
/// A pipeline is an ordered `Vec<Step>`; order is significant.
#[derive(Debug)]
pub struct Step {
    pub description: String,
    pub action: StepAction,
}

impl Step {
    /// A step that runs a shell command.
    pub fn shell(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            action: StepAction::Shell(command.into()),
        }
    }

    /// A step that invokes a callback.
    pub fn call<F>(description: impl Into<String>, f: F) -> Self
    where
        F: FnMut() -> Result<StepOutput, StepError> + 'static,
    {
        Self {
            description: description.into(),
            action: StepAction::Call(Box::new(f)),
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
