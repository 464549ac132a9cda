//! Target expansion from raw host strings to concrete probe URLs.
//!
//! Supports:
//! - Full URLs ("https://example.com/login") passed through unchanged
//! - Bare hostnames expanded over the configured port list
//! - IPv4/IPv6 literals
//! - Optional ":port" suffixes on bare targets

use crate::output;
use std::net::IpAddr;

/// Expand raw targets into the concrete URL list to probe.
///
/// A target that already carries a scheme is passed through unchanged.
/// Everything else is expanded per configured port: port 443 maps to
/// `https://target`, port 80 to `http://target`, and any other port emits
/// both `http://target:port` and `https://target:port`.
///
/// Emission order follows input target order, then port list order, with no
/// deduplication — duplicate targets are probed independently. Malformed
/// targets are skipped with a warning rather than failing the run.
pub fn expand_targets(targets: &[String], ports: &[String]) -> Vec<String> {
    let mut urls = Vec::new();

    for target in targets {
        let target = target.trim();
        if target.is_empty() {
            continue;
        }

        if target.contains("://") {
            urls.push(target.to_string());
            continue;
        }

        if !is_valid_target(target) {
            output::print_warning(&format!("skipping invalid target '{}'", target));
            tracing::warn!(target, "skipping invalid target");
            continue;
        }

        for port in ports {
            match port.as_str() {
                "443" => urls.push(format!("https://{}", target)),
                "80" => urls.push(format!("http://{}", target)),
                other => {
                    urls.push(format!("http://{}:{}", target, other));
                    urls.push(format!("https://{}:{}", target, other));
                }
            }
        }
    }

    urls
}

/// Check whether a schemeless target is a plausible host, with an optional
/// ":port" suffix.
fn is_valid_target(target: &str) -> bool {
    // IPv6 literals contain colons of their own; accept them wholesale.
    if target.parse::<IpAddr>().is_ok() {
        return true;
    }

    let host = match target.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) && !port.is_empty() => host,
        Some(_) => return false,
        None => target,
    };

    host.parse::<IpAddr>().is_ok() || is_valid_hostname(host)
}

/// Check if a string is a valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    // Each label must be 1-63 characters, start and end alphanumeric, and
    // contain only alphanumerics and hyphens.
    for label in s.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label.chars().next().map_or(false, |c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().last().map_or(false, |c| c.is_alphanumeric()) {
            return false;
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}
