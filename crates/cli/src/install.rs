// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! The install pipeline: a strict linear composition of step runs,
//! readiness polls, and the values edit.
//!
//! Any failure aborts the remaining stages; side effects already applied
//! stay applied. The final deployment wait is deliberately unbounded;
//! the operator watches dots until the stack is up or gives up with ^C.

use std::io::Write;
use std::time::Duration;

use gw_core::{Clock, Step, SystemClock};
use gw_engine::{
    wait_until, PollLimit, PrivilegeContext, StepExecutor, TemplateRegistry,
};

use crate::chart::{self, AtlasChart};
use crate::cluster::Cluster;
use crate::color;
use crate::proxy::{self, Upstream};
use crate::report::ConsoleReporter;

/// Validated inputs the pipeline needs; produced by preflight.
pub struct InstallPlan {
    pub frontend: String,
    pub backend: String,
    pub license: String,
    pub registry_user: String,
    pub registry_token: String,
    /// At least one hostname does not point here yet; remind at the end.
    pub dns_note: bool,
    pub external_ip: String,
}

pub fn install(plan: &InstallPlan, privileges: &PrivilegeContext) -> anyhow::Result<()> {
    let clock = SystemClock;
    let executor = StepExecutor::new(ConsoleReporter, clock.clone());
    let operator = privileges.original().clone();
    let cluster = Cluster::new(&operator);
    let chart = AtlasChart::new(&cluster, operator.cwd.clone());
    let registry = TemplateRegistry::builtin();

    println!("{}", color::bold("Starting installation..."));

    executor.run_all(cluster.runtime_install_steps())?;
    executor.run_all(vec![
        cluster.kubectl_install_step(),
        cluster.kubeconfig_setup_step(&operator),
    ])?;

    print!("Wait for the control plane to be ready... ");
    flush();
    clock.sleep(Duration::from_secs(5));
    wait_until(
        &clock,
        "control plane",
        PollLimit::Attempts(5),
        Duration::from_secs(5),
        || {
            let ready = cluster.control_plane_ready();
            if !ready {
                print!(".");
                flush();
            }
            ready
        },
    )?;
    println!("{}", color::green("done"));

    executor.run_all(vec![
        cluster.license_secret_step(&plan.license),
        cluster.registry_secret_step(&plan.registry_user, &plan.registry_token),
        cluster.helm_install_step(),
        chart.repo_add_step(),
        chart.pull_step(),
        chart.extract_step(),
        chart.values_edit_step(&registry, &plan.frontend, &plan.backend),
        chart.install_step(),
        settle_step(clock.clone()),
    ])?;

    let frontend_ip = run_for_output(
        &executor,
        chart::service_ip_step(&cluster, "Resolve frontend service IP", "atlas-frontend-service"),
    )?;
    println!("Frontend service IP: {}", color::green(&frontend_ip));
    let backend_ip = run_for_output(
        &executor,
        chart::service_ip_step(&cluster, "Resolve backend service IP", "atlas-backend-service"),
    )?;
    println!("Backend service IP: {}", color::green(&backend_ip));

    executor.run_all(vec![
        proxy::install_step(),
        proxy::configure_step(
            proxy::SITE_CONFIG_PATH,
            vec![
                Upstream {
                    hostname: plan.frontend.clone(),
                    ip: frontend_ip,
                },
                Upstream {
                    hostname: plan.backend.clone(),
                    ip: backend_ip,
                },
            ],
        ),
        proxy::restart_step(),
    ])?;

    println!("{}", color::green("Installation complete!"));
    if plan.dns_note {
        println!(
            "{}",
            color::bold(&format!(
                "Don't forget to point {} and {} at {} in your DNS server or /etc/hosts file.",
                plan.frontend, plan.backend, plan.external_ip
            ))
        );
    }

    print!("Waiting for services to become available (this can take a few minutes)...");
    flush();
    wait_until(
        &clock,
        "deployments",
        PollLimit::Unbounded,
        Duration::from_secs(5),
        || {
            let ready = cluster.all_deployments_ready();
            if !ready {
                print!(".");
                flush();
            }
            ready
        },
    )?;
    println!("{}", color::green(" done"));
    tracing::info!(frontend = %plan.frontend, backend = %plan.backend, "install finished");
    println!("{}", color::bold("Atlas is ready!"));
    Ok(())
}

/// The API takes a moment to materialize services after a chart install.
fn settle_step(clock: SystemClock) -> Step {
    Step::call("Wait for services to be created", move || {
        clock.sleep(Duration::from_secs(5));
        Ok(None)
    })
}

fn run_for_output(
    executor: &StepExecutor<ConsoleReporter, SystemClock>,
    step: Step,
) -> anyhow::Result<String> {
    let output = executor.run(step)?;
    Ok(output.unwrap_or_default().trim().to_string())
}

fn flush() {
    let _ = std::io::stdout().flush();
}
