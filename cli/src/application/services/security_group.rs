//! Security group wiring that lets test apps reach a service instance.

use std::io::Write as _;
use std::net::IpAddr;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::application::ports::HostResolver;
use crate::domain::security_group::{preferred_address, render_rules};
use crate::domain::{Credentials, SecurityRule};

/// Derive the access rule for a service from its credentials.
///
/// Literal IP hosts are used as-is; anything else goes through `resolver`.
///
/// # Errors
///
/// Returns an error if the host does not resolve to any address.
pub async fn rule_for_credentials(
    resolver: &impl HostResolver,
    credentials: &Credentials,
    service_name: &str,
) -> Result<SecurityRule> {
    let address = match credentials.host.parse::<IpAddr>() {
        Ok(ip) => ip,
        Err(_) => {
            let addresses = resolver
                .resolve(&credentials.host)
                .await
                .with_context(|| format!("resolving {}", credentials.host))?;
            preferred_address(&addresses)
                .ok_or_else(|| anyhow::anyhow!("{} resolved to no addresses", credentials.host))?
        }
    };
    tracing::debug!(host = %credentials.host, %address, "resolved service host");
    Ok(SecurityRule::for_service(
        address,
        credentials.port,
        service_name,
    ))
}

/// Write `rules` to a uniquely-named temporary JSON file.
///
/// The file is deleted when the returned handle is dropped or closed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn stage_rules(service_name: &str, rules: &[SecurityRule]) -> Result<NamedTempFile> {
    let body = render_rules(rules).context("encoding security group rules")?;
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{service_name}_security_group"))
        .suffix(".json")
        .tempfile()
        .context("creating security group file")?;
    file.write_all(body.as_bytes())
        .and_then(|()| file.flush())
        .with_context(|| format!("writing {}", file.path().display()))?;
    Ok(file)
}
