// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! ANSI coloring for operator-facing output.

use std::io::IsTerminal;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn paint(style: &str, text: &str) -> String {
    if should_colorize() {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Success markers ("done", resolved addresses).
pub fn green(text: &str) -> String {
    paint(GREEN, text)
}

/// Failure markers and halt messages.
pub fn red_bold(text: &str) -> String {
    paint(&format!("{RED}{BOLD}"), text)
}

/// Dry-run and caution notes.
pub fn yellow_bold(text: &str) -> String {
    paint(&format!("{YELLOW}{BOLD}"), text)
}

/// Emphasis without a verdict.
pub fn bold(text: &str) -> String {
    paint(BOLD, text)
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
