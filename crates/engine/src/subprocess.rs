// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Shell command execution with captured output.

use std::process::{Command, Stdio};

use gw_core::StepError;

/// Run a command line through `sh -c`, capturing combined stdout/stderr.
///
/// A non-zero exit status is a [`StepError::Shell`] carrying the captured
/// output as the error detail.
pub fn run_shell(description: &str, command: &str) -> Result<String, StepError> {
    tracing::debug!(%command, "running shell step");
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| StepError::Spawn {
            description: description.to_string(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        Ok(combined)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(%command, exit_code, "shell step failed");
        Err(StepError::Shell {
            description: description.to_string(),
            output: combined.trim().to_string(),
        })
    }
}

/// Exit-status probe for readiness predicates. Output is discarded;
/// a command that cannot be spawned counts as not ready.
pub fn shell_succeeds(command: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
