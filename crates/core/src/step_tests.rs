// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

use super::*;

#[test]
fn shell_constructor_keeps_command_text() {
    let step = Step::shell("List root", "ls /");
    assert_eq!(step.description, "List root");
    match step.action {
        StepAction::Shell(cmd) => assert_eq!(cmd, "ls /"),
        StepAction::Call(_) => panic!("expected shell action"),
    }
}

#[test]
fn call_constructor_wraps_callback() {
    let mut step = Step::call("Return a value", || Ok(Some("value".to_string())));
    match &mut step.action {
        StepAction::Call(f) => assert_eq!(f().unwrap(), Some("value".to_string())),
        StepAction::Shell(_) => panic!("expected callback action"),
    }
}

#[test]
fn shell_error_display_includes_description_and_output() {
    let err = StepError::Shell {
        description: "Install nginx".to_string(),
        output: "E: Unable to locate package".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("Install nginx"));
    assert!(text.contains("Unable to locate package"));
}

#[test]
fn failed_error_preserves_callback_detail() {
    let err = StepError::Failed("values file not found: /tmp/nope".to_string());
    assert_eq!(err.to_string(), "values file not found: /tmp/nope");
}

#[test]
fn debug_formatting_does_not_panic_on_callbacks() {
    let step = Step::call("noop", || Ok(None));
    let text = format!("{:?}", step);
    assert!(text.contains("noop"));
}
