// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

use super::*;

#[test]
fn successful_command_returns_stdout() {
    let out = run_shell("echo", "printf hello").unwrap();
    assert_eq!(out, "hello");
}

#[test]
fn output_combines_stdout_and_stderr() {
    let out = run_shell("both", "printf out; printf err >&2").unwrap();
    assert!(out.contains("out"));
    assert!(out.contains("err"));
}

#[test]
fn nonzero_exit_is_a_shell_error_with_output() {
    let err = run_shell("fail", "printf boom >&2; exit 3").unwrap_err();
    match err {
        StepError::Shell {
            description,
            output,
        } => {
            assert_eq!(description, "fail");
            assert_eq!(output, "boom");
        }
        other => panic!("expected shell error, got {other:?}"),
    }
}

#[test]
fn shell_succeeds_reflects_exit_status() {
    assert!(shell_succeeds("true"));
    assert!(!shell_succeeds("false"));
}
