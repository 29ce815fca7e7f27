// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-core: Core types for the Groundwork bootstrap installer.

pub mod clock;
pub mod merge;
pub mod step;

pub use clock::{Clock, FakeClock, SystemClock};
pub use merge::{deep_merge, merge_mappings};
pub use step::{Step, StepAction, StepError, StepOutput};
