// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

use super::*;
use gw_core::StepAction;

fn upstreams() -> Vec<Upstream> {
    vec![
        Upstream {
            hostname: "ui.example.com".to_string(),
            ip: "10.96.0.10".to_string(),
        },
        Upstream {
            hostname: "api.example.com".to_string(),
            ip: "10.96.0.11".to_string(),
        },
    ]
}

#[test]
fn one_server_block_per_upstream() {
    let config = render_config(&upstreams());
    assert_eq!(config.matches("server {").count(), 2);
    assert!(config.contains("server_name ui.example.com;"));
    assert!(config.contains("proxy_pass http://10.96.0.10;"));
    assert!(config.contains("server_name api.example.com;"));
    assert!(config.contains("proxy_pass http://10.96.0.11;"));
}

#[test]
fn forwarding_headers_are_set() {
    let config = render_config(&upstreams());
    for header in [
        "proxy_set_header Host $host;",
        "proxy_set_header X-Real-IP $remote_addr;",
        "proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;",
        "proxy_set_header X-Forwarded-Proto $scheme;",
    ] {
        assert_eq!(config.matches(header).count(), 2, "missing {header}");
    }
}

#[test]
fn configure_step_overwrites_the_target_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("default");
    std::fs::write(&path, "old content").unwrap();

    let mut step = configure_step(&path, upstreams());
    match &mut step.action {
        StepAction::Call(f) => {
            f().unwrap();
        }
        StepAction::Shell(_) => panic!("expected callback step"),
    }

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.contains("old content"));
    assert!(written.contains("server_name ui.example.com;"));
}

#[test]
fn install_and_restart_are_shell_steps() {
    assert!(matches!(install_step().action, StepAction::Shell(_)));
    assert!(matches!(restart_step().action, StepAction::Shell(_)));
}
