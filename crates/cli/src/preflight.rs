// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Groundwork Contributors

//! Preflight validation: everything the installer checks before it is
//! allowed to touch the machine.
//!
//! Hostname checks that fail DNS resolution are not fatal: the operator
//! can confirm and fix DNS later; the caller collects the "needs a DNS
//! entry" notes and reminds the operator after the install.

use std::net::ToSocketAddrs;
use std::sync::OnceLock;

use base64::Engine;
use regex::Regex;
use thiserror::Error;

/// IP echo service used to learn this machine's public address.
const IP_ECHO_URL: &str = "https://api.ipify.org";

/// Container image the registry token must be able to see.
const BACKEND_IMAGE: &str = "atlas-backend";

#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("failed to get external IP address ({0}); do you have an internet connection?")]
    ExternalIp(String),

    #[error("{field} hostname cannot be empty")]
    EmptyHostname { field: &'static str },

    #[error("invalid {field} hostname: {value}")]
    InvalidHostname { field: &'static str, value: String },

    #[error("frontend and backend hostnames cannot be the same")]
    HostnamesEqual,

    #[error("aborted by operator")]
    Aborted,

    #[error("invalid license key: {0}")]
    License(String),

    #[error("registry token rejected: {0}")]
    RegistryToken(String),
}

/// Learn the machine's public IP from the echo service.
pub fn external_ip() -> Result<String, PreflightError> {
    let body = reqwest::blocking::get(IP_ECHO_URL)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|e| PreflightError::ExternalIp(e.to_string()))?;
    let ip = body.trim().to_string();
    if ip.is_empty() {
        return Err(PreflightError::ExternalIp("empty response".to_string()));
    }
    tracing::debug!(%ip, "external address resolved");
    Ok(ip)
}

// RFC-1123 label: alphanumeric, hyphens inside only, 1-63 chars.
#[allow(clippy::unwrap_used)] // literal pattern, cannot fail to compile
fn label_regex() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").unwrap())
}

/// Syntactic hostname validity: every dot-separated label matches the
/// RFC-1123 shape and the whole name fits in 253 characters.
pub fn hostname_syntax_ok(value: &str) -> bool {
    if value.is_empty() || value.len() > 253 {
        return false;
    }
    value.split('.').all(|label| label_regex().is_match(label))
}

/// Outcome of a hostname check that passed.
#[derive(Debug, PartialEq, Eq)]
pub struct HostnameCheck {
    /// The name does not currently point at this machine; remind the
    /// operator to fix DNS after the install.
    pub needs_dns_note: bool,
}

/// Validate one hostname against syntax, DNS, and the external IP.
///
/// `confirm` is asked (once per condition, reset every run) when the name
/// does not resolve or resolves elsewhere; declining aborts the run.
pub fn check_hostname(
    field: &'static str,
    value: &str,
    external_ip: &str,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> Result<HostnameCheck, PreflightError> {
    check_hostname_with(field, value, external_ip, resolve, confirm)
}

fn check_hostname_with(
    field: &'static str,
    value: &str,
    external_ip: &str,
    lookup: impl Fn(&str) -> Option<String>,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> Result<HostnameCheck, PreflightError> {
    if value.is_empty() {
        return Err(PreflightError::EmptyHostname { field });
    }
    if !hostname_syntax_ok(value) {
        return Err(PreflightError::InvalidHostname {
            field,
            value: value.to_string(),
        });
    }

    match lookup(value) {
        None => {
            let question = format!(
                "Hostname {value} doesn't resolve to an IP. You'll need to add it to DNS or /etc/hosts later. Continue?"
            );
            if confirm(&question) {
                Ok(HostnameCheck { needs_dns_note: true })
            } else {
                Err(PreflightError::Aborted)
            }
        }
        Some(resolved) if resolved != external_ip => {
            let question = format!(
                "Hostname {value} resolves to {resolved}, not {external_ip}. You'll need to update DNS or /etc/hosts later. Continue?"
            );
            if confirm(&question) {
                Ok(HostnameCheck { needs_dns_note: true })
            } else {
                Err(PreflightError::Aborted)
            }
        }
        Some(_) => Ok(HostnameCheck {
            needs_dns_note: false,
        }),
    }
}

// The echo service reports IPv4, so only A records are comparable; a
// name with nothing but AAAA records counts as unresolved.
fn resolve(host: &str) -> Option<String> {
    (host, 443u16)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.find(std::net::SocketAddr::is_ipv4))
        .map(|addr| addr.ip().to_string())
}

/// Unverified JWT check: three segments, header `typ` is JWT, payload
/// carries non-empty entitlements. Signature verification belongs to the
/// backend, not the installer.
pub fn validate_license(token: &str) -> Result<(), PreflightError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(PreflightError::License("not a JWT".to_string()));
    }
    let header = decode_segment(parts[0])?;
    if header.get("typ").and_then(|v| v.as_str()) != Some("JWT") {
        return Err(PreflightError::License("header type is not JWT".to_string()));
    }
    let payload = decode_segment(parts[1])?;
    match payload.get("entitlements") {
        Some(entitlements) if has_content(entitlements) => Ok(()),
        _ => Err(PreflightError::License("no entitlements in payload".to_string())),
    }
}

fn has_content(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
        serde_json::Value::Number(_) => true,
    }
}

fn decode_segment(segment: &str) -> Result<serde_json::Value, PreflightError> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| PreflightError::License("malformed base64 segment".to_string()))?;
    serde_json::from_slice(&bytes)
        .map_err(|_| PreflightError::License("malformed JSON segment".to_string()))
}

/// Probe the container registry with the operator's token; it must be
/// able to see the backend image package.
pub fn check_registry_token(user: &str, token: &str) -> Result<(), PreflightError> {
    let url = format!("https://api.github.com/users/{user}/packages/container/{BACKEND_IMAGE}");
    let response = reqwest::blocking::Client::new()
        .get(url)
        .header("Accept", "application/vnd.github+json")
        .header("Authorization", format!("Bearer {token}"))
        .header("User-Agent", "groundwork")
        .header("X-GitHub-Api-Version", "2022-11-28")
        .send()
        .map_err(|e| PreflightError::RegistryToken(e.to_string()))?;

    if !response.status().is_success() {
        return Err(PreflightError::RegistryToken(format!(
            "registry answered {}",
            response.status()
        )));
    }
    let body: serde_json::Value = response
        .json()
        .map_err(|e| PreflightError::RegistryToken(e.to_string()))?;
    if body.get("package_type").and_then(|v| v.as_str()) != Some("container") {
        return Err(PreflightError::RegistryToken(
            "token cannot see the backend image".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "preflight_tests.rs"]
mod tests;
