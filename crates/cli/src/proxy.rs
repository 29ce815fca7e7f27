// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Reverse proxy collaborator: nginx install and configuration steps.
//!
//! The generated config is a full overwrite of the default site, one
//! server block per hostname, proxying to the resolved cluster IPs.

use std::path::PathBuf;

use gw_core::{Step, StepError};

/// Site config overwritten with the Atlas server blocks.
pub const SITE_CONFIG_PATH: &str = "/etc/nginx/sites-available/default";

/// One upstream behind the proxy.
pub struct Upstream {
    pub hostname: String,
    pub ip: String,
}

pub fn install_step() -> Step {
    Step::shell("Install nginx", "apt-get install -y nginx")
}

pub fn restart_step() -> Step {
    Step::shell("Restart nginx", "systemctl restart nginx")
}

/// Overwrite the default site with server blocks for the upstreams.
pub fn configure_step(path: impl Into<PathBuf>, upstreams: Vec<Upstream>) -> Step {
    let path = path.into();
    Step::call("Create nginx config", move || {
        let config = render_config(&upstreams);
        std::fs::write(&path, config)
            .map_err(|e| StepError::Failed(format!("write {}: {e}", path.display())))?;
        Ok(None)
    })
}

fn render_config(upstreams: &[Upstream]) -> String {
    upstreams.iter().map(server_block).collect()
}

fn server_block(upstream: &Upstream) -> String {
    format!(
        r#"server {{
    listen 80;
    server_name {hostname};
    location / {{
        proxy_pass http://{ip};
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
    }}
}}

"#,
        hostname = upstream.hostname,
        ip = upstream.ip
    )
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
