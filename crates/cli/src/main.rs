// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! `groundwork` bootstraps a single-node Atlas stack on a fresh Linux
//! host: k0s, kubectl, Helm, the Atlas chart, and an nginx front proxy.
//!
//! The binary re-executes itself under sudo, validates its inputs before
//! touching the machine, then hands off to the install pipeline.

mod chart;
mod cluster;
mod color;
mod install;
mod preflight;
mod proxy;
mod report;

use std::io::Write;

use clap::Parser;
use gw_engine::{PrivilegeContext, SudoGateway};
use tracing_subscriber::EnvFilter;

use crate::preflight::PreflightError;

const RISK_PHRASE: &str = "I do not care about this machine";

#[derive(Debug, Parser)]
#[command(name = "groundwork", version, about = "Bootstrap an Atlas stack on this machine")]
struct App {
    /// Hostname the frontend will be served on
    #[arg(long, env = "GW_FRONTEND")]
    frontend: String,

    /// Hostname the backend API will be served on
    #[arg(long, env = "GW_BACKEND")]
    backend: String,

    /// Atlas license key (JWT)
    #[arg(long, env = "GW_LICENSE")]
    license: String,

    /// GitHub username that owns the registry token
    #[arg(long, env = "GW_REGISTRY_USER")]
    registry_user: String,

    /// GitHub token with read access to the Atlas container images
    #[arg(long, env = "GW_REGISTRY_TOKEN")]
    registry_token: String,

    /// Validate inputs and exit without changing the machine
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    init_tracing();
    let app = App::parse();
    if let Err(err) = run(app) {
        eprintln!("{} {err:#}", color::red_bold("Installation halted:"));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("GW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(app: App) -> anyhow::Result<()> {
    let privileges = PrivilegeContext::ensure_elevated(&SudoGateway)?;

    println!("{}", color::red_bold("--- WARNING ---"));
    println!("This installer expects a fresh Linux machine. It installs software and overwrites files.");
    println!("Don't run it on a machine that you care about!");
    let answer = report::prompt(&color::red_bold(&format!(
        "To continue, type '{RISK_PHRASE}'"
    )))?;
    if answer != RISK_PHRASE {
        anyhow::bail!("you might care about this machine");
    }

    if app.frontend == app.backend {
        return Err(PreflightError::HostnamesEqual.into());
    }

    print!("Getting external IP address... ");
    let _ = std::io::stdout().flush();
    let external_ip = preflight::external_ip()?;
    println!("{}", color::green(&external_ip));

    let mut confirm = report::confirm;
    let mut dns_note = false;
    for (field, value) in [("frontend", &app.frontend), ("backend", &app.backend)] {
        let check = preflight::check_hostname(field, value, &external_ip, &mut confirm)?;
        dns_note |= check.needs_dns_note;
    }

    preflight::validate_license(&app.license)?;
    preflight::check_registry_token(&app.registry_user, &app.registry_token)?;

    if app.dry_run {
        println!("{} inputs are valid, no changes made", color::yellow_bold("Dry run:"));
        return Ok(());
    }

    let plan = install::InstallPlan {
        frontend: app.frontend,
        backend: app.backend,
        license: app.license,
        registry_user: app.registry_user,
        registry_token: app.registry_token,
        dns_note,
        external_ip,
    };
    install::install(&plan, &privileges)
}
