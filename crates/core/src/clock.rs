// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Clock abstraction for testable time handling.
//!
//! All waiting in the installer is cooperative sleep-then-recheck, so the
//! clock carries `sleep` alongside `now`. Tests swap in [`FakeClock`] to
//! count sleeps and advance time instantly.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides the current time and cooperative sleeping
pub trait Clock: Clone {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Fake clock for testing: sleeping advances time without blocking
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
    }

    /// Number of sleeps performed so far
    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().len()
    }

    /// Sum of all sleep durations
    pub fn total_slept(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        *self.current.lock() += duration;
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
