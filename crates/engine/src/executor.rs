// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Ordered step execution with uniform failure handling.
//!
//! The executor announces each step through a [`StepReporter`] before
//! running it and reports the outcome after. The first failure aborts the
//! remaining steps; completed side effects are never rolled back. Retries
//! are not this layer's job; wrap a predicate in [`crate::poll::wait_until`]
//! instead.

use gw_core::{Clock, Step, StepAction, StepError, StepOutput};

use crate::subprocess::run_shell;

/// Progress reporting seam. The CLI plugs in a console reporter; tests
/// plug in a recording fake.
pub trait StepReporter {
    fn step_started(&self, description: &str);
    fn step_succeeded(&self, description: &str);
    fn step_failed(&self, description: &str, error: &StepError);
}

/// Runs steps strictly in order under the already-elevated identity.
pub struct StepExecutor<R: StepReporter, C: Clock> {
    reporter: R,
    clock: C,
}

impl<R: StepReporter, C: Clock> StepExecutor<R, C> {
    pub fn new(reporter: R, clock: C) -> Self {
        Self { reporter, clock }
    }

    /// Run one step, reporting before and after.
    pub fn run(&self, step: Step) -> Result<StepOutput, StepError> {
        let Step {
            description,
            action,
        } = step;
        self.reporter.step_started(&description);
        let started = self.clock.now();

        let result = match action {
            StepAction::Shell(command) => run_shell(&description, &command).map(Some),
            StepAction::Call(mut f) => f(),
        };

        let elapsed = self.clock.now().duration_since(started);
        match result {
            Ok(output) => {
                tracing::info!(step = %description, elapsed_ms = elapsed.as_millis() as u64, "step done");
                self.reporter.step_succeeded(&description);
                Ok(output)
            }
            Err(error) => {
                tracing::warn!(step = %description, error = %error, "step failed");
                self.reporter.step_failed(&description, &error);
                Err(error)
            }
        }
    }

    /// Run steps in order, stopping at the first failure.
    ///
    /// On failure the remaining steps are never invoked and the failing
    /// step's error propagates unchanged. On success, returns the per-step
    /// results in order.
    pub fn run_all(&self, steps: Vec<Step>) -> Result<Vec<StepOutput>, StepError> {
        let mut results = Vec::with_capacity(steps.len());
        for step in steps {
            results.push(self.run(step)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
