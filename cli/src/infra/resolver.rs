//! DNS infrastructure — implements `HostResolver` with tokio's resolver.

use std::net::IpAddr;

use anyhow::{Context, Result};

use crate::application::ports::HostResolver;

/// Production resolver backed by the system's `getaddrinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioHostResolver;

impl HostResolver for TokioHostResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0))
            .await
            .with_context(|| format!("DNS lookup of {host} failed"))?;
        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips)
    }
}
