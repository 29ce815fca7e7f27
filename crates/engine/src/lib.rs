// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-engine: host-touching primitives for the Groundwork installer.
//!
//! Everything here runs synchronously under one actor: the shell runner,
//! the step executor, the readiness poller, the sudo privilege context,
//! and the values-file mutator.

pub mod executor;
pub mod poll;
pub mod privilege;
pub mod subprocess;
pub mod values;

pub use executor::{StepExecutor, StepReporter};
pub use poll::{wait_until, PollError, PollLimit};
pub use privilege::{
    ElevationGateway, Identity, PrivilegeContext, PrivilegeError, SudoGateway,
};
pub use subprocess::{run_shell, shell_succeeds};
pub use values::{
    apply_patches, backup, edit_document, load_document, save_document, TemplateRegistry,
    ValuesError,
};
