// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Cluster runtime collaborator: k0s, kubectl, and helm steps, plus the
//! readiness predicates the orchestrator polls.
//!
//! Everything here either produces opaque [`Step`]s for the executor or
//! answers a yes/no readiness question; the orchestration order lives in
//! `install`.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use gw_core::{Clock, Step, StepError, SystemClock};
use gw_engine::{shell_succeeds, wait_until, Identity, PollLimit};
use serde::Deserialize;

/// Path where k0s drops the admin credentials once the controller is up.
const ADMIN_CONF: &str = "/var/lib/k0s/pki/admin.conf";

/// The single-node cluster runtime on this host.
pub struct Cluster {
    kube_home: PathBuf,
    kubeconfig: PathBuf,
    arch: &'static str,
}

impl Cluster {
    /// Paths are rooted in the operator's home so post-install tooling
    /// works without sudo.
    pub fn new(operator: &Identity) -> Self {
        let kube_home = operator.home.join(".kube");
        let kubeconfig = kube_home.join("config");
        Self {
            kube_home,
            kubeconfig,
            arch: GOARCH,
        }
    }

    /// `kubectl --kubeconfig <path>` prefix for cluster commands.
    pub fn kubectl(&self) -> String {
        format!("kubectl --kubeconfig {}", self.kubeconfig.display())
    }

    /// `helm --kubeconfig <path>` prefix for chart commands.
    pub fn helm(&self) -> String {
        format!("helm --kubeconfig {}", self.kubeconfig.display())
    }

    /// Download, install, and start the k0s controller in single-node mode.
    pub fn runtime_install_steps(&self) -> Vec<Step> {
        vec![
            Step::shell(
                "Download k0s",
                "curl -sSLf https://get.k0s.sh/ -o k0s-install.sh",
            ),
            Step::shell("Make k0s-install.sh executable", "chmod +x k0s-install.sh"),
            Step::shell("Run k0s-install.sh", "./k0s-install.sh"),
            Step::shell("Install k0s", "k0s install controller --single"),
            Step::shell("Start k0s", "k0s start"),
        ]
    }

    /// Fetch the current stable kubectl into /usr/local/bin.
    pub fn kubectl_install_step(&self) -> Step {
        let command = format!(
            "curl -sSLf \"https://dl.k8s.io/release/$(curl -sSLf https://dl.k8s.io/release/stable.txt)/bin/linux/{arch}/kubectl\" \
             -o /usr/local/bin/kubectl && chmod 755 /usr/local/bin/kubectl",
            arch = self.arch
        );
        Step::shell("Install kubectl", command)
    }

    /// Copy the k0s admin credentials into the operator's kubeconfig.
    ///
    /// The admin.conf file appears some time after `k0s start`, so its
    /// existence is polled. The resulting kubeconfig is owned by the
    /// operator, mode 0600.
    pub fn kubeconfig_setup_step(&self, operator: &Identity) -> Step {
        let kube_home = self.kube_home.clone();
        let kubeconfig = self.kubeconfig.clone();
        let operator = operator.clone();
        Step::call("Configure kubectl", move || {
            let admin_conf = PathBuf::from(ADMIN_CONF);
            wait_until(
                &SystemClock,
                "cluster admin credentials",
                PollLimit::Attempts(5),
                Duration::from_secs(2),
                || admin_conf.exists(),
            )?;
            std::fs::create_dir_all(&kube_home)
                .map_err(|e| StepError::Failed(format!("create {}: {e}", kube_home.display())))?;
            std::fs::copy(&admin_conf, &kubeconfig)
                .map_err(|e| StepError::Failed(format!("copy admin.conf: {e}")))?;
            operator.restore_ownership(&kube_home)?;
            std::fs::set_permissions(&kubeconfig, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| StepError::Failed(format!("chmod kubeconfig: {e}")))?;
            Ok(None)
        })
    }

    /// Install the latest helm release into /usr/local/bin.
    pub fn helm_install_step(&self) -> Step {
        let command = format!(
            "HELM_VERSION=$(curl -sSLf https://api.github.com/repos/helm/helm/releases/latest \
             | grep -o '\"tag_name\": *\"[^\"]*\"' | cut -d'\"' -f4) && \
             curl -sSLf \"https://get.helm.sh/helm-${{HELM_VERSION}}-linux-{arch}.tar.gz\" \
             | tar -xzOf - linux-{arch}/helm > /usr/local/bin/helm && chmod 755 /usr/local/bin/helm",
            arch = self.arch
        );
        Step::shell("Install helm", command)
    }

    /// Store the license where the backend expects it.
    pub fn license_secret_step(&self, license: &str) -> Step {
        Step::shell(
            "Add Atlas license",
            format!(
                "{} create secret generic atlas-secret --from-literal LICENSE_JWT='{license}'",
                self.kubectl()
            ),
        )
    }

    /// Image pull credentials for the Atlas registry.
    pub fn registry_secret_step(&self, user: &str, token: &str) -> Step {
        Step::shell(
            "Add registry credentials",
            format!(
                "{} create secret docker-registry atlas-registry-secret \
                 --docker-server=ghcr.io --docker-username={user} --docker-password={token}",
                self.kubectl()
            ),
        )
    }

    /// Does the control plane answer an API request yet?
    pub fn control_plane_ready(&self) -> bool {
        shell_succeeds(&format!("{} get nodes", self.kubectl()))
    }

    /// Do all deployments report every replica ready?
    ///
    /// Query errors count as not ready; the caller is always inside a poll.
    pub fn all_deployments_ready(&self) -> bool {
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("{} get deployments -o json", self.kubectl()))
            .output();
        match output {
            Ok(output) if output.status.success() => {
                deployments_ready(&String::from_utf8_lossy(&output.stdout)).unwrap_or(false)
            }
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct DeploymentList {
    #[serde(default)]
    items: Vec<Deployment>,
}

#[derive(Deserialize)]
struct Deployment {
    #[serde(default)]
    status: DeploymentStatus,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct DeploymentStatus {
    #[serde(default)]
    ready_replicas: Option<u32>,
    #[serde(default)]
    replicas: Option<u32>,
}

/// Every deployment must report `readyReplicas == replicas`; a missing
/// status or replica count means not ready.
pub fn deployments_ready(json: &str) -> Result<bool, serde_json::Error> {
    let list: DeploymentList = serde_json::from_str(json)?;
    Ok(list.items.iter().all(|d| match d.status.replicas {
        Some(replicas) => d.status.ready_replicas.unwrap_or(0) == replicas,
        None => false,
    }))
}

/// GOARCH-style name for the host architecture, as k0s/kubectl/helm
/// release URLs expect.
const GOARCH: &str = if cfg!(target_arch = "aarch64") {
    "arm64"
} else {
    "amd64"
};

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
