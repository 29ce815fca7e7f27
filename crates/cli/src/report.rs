// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Console progress reporting and operator prompts.
//!
//! Step progress prints as `<description>... done` / `... error`; the
//! failure detail itself is reported once, by `main`, when the run halts.

use std::io::Write;

use gw_core::StepError;
use gw_engine::StepReporter;

use crate::color;

/// Prints step progress to stdout.
#[derive(Clone, Copy, Default)]
pub struct ConsoleReporter;

impl StepReporter for ConsoleReporter {
    fn step_started(&self, description: &str) {
        print!("{description}... ");
        let _ = std::io::stdout().flush();
    }

    fn step_succeeded(&self, _description: &str) {
        println!("{}", color::green("done"));
    }

    fn step_failed(&self, _description: &str, _error: &StepError) {
        println!("{}", color::red_bold("error"));
    }
}

/// Print `label` and read one trimmed line from stdin.
pub fn prompt(label: &str) -> std::io::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Yes/no confirmation, defaulting to no.
pub fn confirm(question: &str) -> bool {
    match prompt(&format!("{question} [y/N]")) {
        Ok(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
