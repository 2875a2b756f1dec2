//! Network access rules granted to apps for reaching a service instance.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Transport protocol of an access rule. Service instances are only ever
/// reached over TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
}

/// A single entry of a security-group definition file.
///
/// Field order matches the order the platform documents: protocol,
/// destination, ports, description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRule {
    pub protocol: Protocol,
    pub destination: String,
    pub ports: String,
    pub description: String,
}

impl SecurityRule {
    /// Rule allowing TCP traffic to a single address and port of a service.
    #[must_use]
    pub fn for_service(address: IpAddr, port: u16, service_name: &str) -> Self {
        Self {
            protocol: Protocol::Tcp,
            destination: host_cidr(address),
            ports: port.to_string(),
            description: format!("Allow traffic to {service_name}"),
        }
    }
}

/// App lifecycle phase a security group is bound for. Test apps need the
/// rule while running, never while staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
}

impl Lifecycle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
        }
    }
}

/// Single-host CIDR for an address: `/32` for IPv4, `/128` for IPv6.
#[must_use]
pub fn host_cidr(address: IpAddr) -> String {
    match address {
        IpAddr::V4(v4) => format!("{v4}/32"),
        IpAddr::V6(v6) => format!("{v6}/128"),
    }
}

/// Pick the address a rule should target: the first IPv4 address if any,
/// otherwise the first address.
#[must_use]
pub fn preferred_address(addresses: &[IpAddr]) -> Option<IpAddr> {
    addresses
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addresses.first())
        .copied()
}

/// Render rules as the JSON array the platform CLI expects.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_rules(rules: &[SecurityRule]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rules)
}
