// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Workspace-level CLI surface specs.
//!
//! These exercise argument parsing only. Everything past a successful
//! parse elevates privileges and mutates the host, so it stays out of
//! the automated suite.

use std::process::Output;

use assert_cmd::Command;

struct Spec {
    output: Output,
}

fn cli(args: &[&str]) -> Spec {
    let mut cmd = Command::cargo_bin("groundwork").unwrap();
    // A populated GW_* environment would satisfy required options and
    // let the run proceed past parsing.
    cmd.env_clear();
    cmd.args(args);
    Spec {
        output: cmd.output().unwrap(),
    }
}

impl Spec {
    fn passes(self) -> Self {
        assert!(
            self.output.status.success(),
            "expected success, got {:?}\nstderr: {}",
            self.output.status,
            String::from_utf8_lossy(&self.output.stderr)
        );
        self
    }

    fn fails(self) -> Self {
        assert!(
            !self.output.status.success(),
            "expected failure, got success\nstdout: {}",
            String::from_utf8_lossy(&self.output.stdout)
        );
        self
    }

    fn stdout_has(self, needle: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(stdout.contains(needle), "stdout missing {needle:?}:\n{stdout}");
        self
    }

    fn stderr_has(self, needle: &str) -> Self {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(stderr.contains(needle), "stderr missing {needle:?}:\n{stderr}");
        self
    }
}

#[test]
fn help_lists_every_option() {
    cli(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--frontend")
        .stdout_has("--backend")
        .stdout_has("--license")
        .stdout_has("--registry-user")
        .stdout_has("--registry-token")
        .stdout_has("--dry-run");
}

#[test]
fn version_prints_package_version() {
    cli(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn no_args_is_a_usage_error() {
    cli(&[]).fails().stderr_has("Usage:").stderr_has("--frontend");
}

#[test]
fn missing_license_is_a_usage_error() {
    cli(&[
        "--frontend",
        "app.example.com",
        "--backend",
        "api.example.com",
        "--registry-user",
        "octocat",
        "--registry-token",
        "ghp_x",
    ])
    .fails()
    .stderr_has("--license");
}

#[test]
fn unknown_flag_is_rejected() {
    cli(&["--uninstall"]).fails().stderr_has("--uninstall");
}
