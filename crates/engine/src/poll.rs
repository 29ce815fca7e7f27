// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Bounded-retry readiness polling.
//!
//! The single wait primitive behind every "wait for external state" spot
//! in the pipeline: a credentials file appearing, the control plane
//! answering, deployments reporting all replicas ready. The limit is
//! explicit: a bounded poll exhausts into [`PollError::NotReady`], an
//! unbounded poll is an operator-facing "wait as long as it takes".

use std::time::Duration;

use gw_core::{Clock, StepError};
use thiserror::Error;

/// Attempt ceiling for a poll. `Attempts` is always a hard ceiling,
/// even with a zero interval. The predicate runs at least once:
/// `Attempts(0)` reports not ready after a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollLimit {
    Attempts(u32),
    Unbounded,
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("{what} not ready after {attempts} attempts")]
    NotReady { what: String, attempts: u32 },
}

impl From<PollError> for StepError {
    fn from(e: PollError) -> Self {
        StepError::Failed(e.to_string())
    }
}

/// Evaluate `predicate` until it returns true, sleeping `interval`
/// between attempts.
///
/// An immediately-true predicate returns without sleeping. A predicate
/// whose underlying check errors should report false; errors are "not
/// ready yet" at this layer.
pub fn wait_until<C, F>(
    clock: &C,
    what: &str,
    limit: PollLimit,
    interval: Duration,
    mut predicate: F,
) -> Result<(), PollError>
where
    C: Clock,
    F: FnMut() -> bool,
{
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        if predicate() {
            tracing::debug!(what, attempts, "ready");
            return Ok(());
        }
        if let PollLimit::Attempts(max) = limit {
            if attempts >= max {
                tracing::warn!(what, attempts, "poll ceiling exhausted");
                return Err(PollError::NotReady {
                    what: what.to_string(),
                    attempts,
                });
            }
        }
        clock.sleep(interval);
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
