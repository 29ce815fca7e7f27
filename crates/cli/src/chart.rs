// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Atlas chart collaborator: fetch, unpack, patch values, install.
//!
//! The chart lands in the operator's working directory so a later
//! `helm upgrade` can start from the same tree the installer used.

use std::path::PathBuf;

use gw_core::{Step, StepError};
use gw_engine::{edit_document, TemplateRegistry};
use serde_yaml::{Mapping, Value};

use crate::cluster::Cluster;

/// Chart repository serving the Atlas releases.
pub const CHART_REPO_URL: &str = "https://charts.atlas.sh";

/// The Atlas application chart on this host.
pub struct AtlasChart {
    helm: String,
    workdir: PathBuf,
    values_path: PathBuf,
}

impl AtlasChart {
    pub fn new(cluster: &Cluster, workdir: PathBuf) -> Self {
        let values_path = workdir.join("atlas").join("values.yaml");
        Self {
            helm: cluster.helm(),
            workdir,
            values_path,
        }
    }

    /// Where the chart's values document lives once unpacked.
    pub fn values_path(&self) -> &PathBuf {
        &self.values_path
    }

    /// Register the Atlas chart repository.
    pub fn repo_add_step(&self) -> Step {
        Step::shell(
            "Add Atlas chart repository",
            format!("{} repo add atlas {CHART_REPO_URL}", self.helm),
        )
    }

    /// Download the chart archive into the working directory.
    pub fn pull_step(&self) -> Step {
        Step::shell(
            "Download Atlas chart",
            format!("cd {} && {} pull atlas/atlas", self.workdir.display(), self.helm),
        )
    }

    /// Unpack the chart archive next to itself.
    pub fn extract_step(&self) -> Step {
        Step::shell(
            "Extract Atlas chart",
            format!("cd {} && tar -xf atlas-*.tgz", self.workdir.display()),
        )
    }

    /// Apply the demo template plus the operator's hostnames to the
    /// chart's values document. Returns the backup path as step output.
    pub fn values_edit_step(
        &self,
        registry: &TemplateRegistry,
        frontend: &str,
        backend: &str,
    ) -> Step {
        let values_path = self.values_path.clone();
        let template = registry.get("demo");
        let hostnames = hostname_patch(frontend, backend);
        Step::call("Edit values.yaml", move || {
            let template = template
                .clone()
                .ok_or_else(|| StepError::Failed("unknown values template: demo".to_string()))?;
            let backup = edit_document(&values_path, &[template, hostnames.clone()])?;
            Ok(Some(backup.display().to_string()))
        })
    }

    /// Install the unpacked chart.
    pub fn install_step(&self) -> Step {
        Step::shell(
            "Install Atlas",
            format!("cd {} && {} install atlas ./atlas", self.workdir.display(), self.helm),
        )
    }
}

/// Patch setting the operator-facing hostnames.
pub fn hostname_patch(frontend: &str, backend: &str) -> Value {
    let mut hostnames = Mapping::new();
    hostnames.insert(
        Value::String("backend".to_string()),
        Value::String(backend.to_string()),
    );
    hostnames.insert(
        Value::String("frontend".to_string()),
        Value::String(frontend.to_string()),
    );
    let mut app = Mapping::new();
    app.insert(Value::String("hostnames".to_string()), Value::Mapping(hostnames));
    let mut root = Mapping::new();
    root.insert(Value::String("app".to_string()), Value::Mapping(app));
    Value::Mapping(root)
}

/// Resolve a service's cluster IP through the API.
pub fn service_ip_step(cluster: &Cluster, description: &str, service: &str) -> Step {
    Step::shell(
        description,
        format!(
            "{} get svc {service} -o jsonpath='{{.spec.clusterIP}}'",
            cluster.kubectl()
        ),
    )
}

#[cfg(test)]
#[path = "chart_tests.rs"]
mod tests;
