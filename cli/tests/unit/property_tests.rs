//! Property-based tests for name generation and credential validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr};

use proptest::prelude::*;

use mits::domain::security_group::host_cidr;
use mits::domain::{Credentials, CredentialsError, ScenarioNames, SecurityRule, prefixed_random_name};

// ============================================================================
// Name generation
// ============================================================================

proptest! {
    /// Names are `<prefix>-<resource>-<16 hex chars>`.
    #[test]
    fn prop_prefixed_name_format(prefix in "[a-z][a-z0-9]{0,15}", resource in "[A-Z]{1,8}") {
        let name = prefixed_random_name(&prefix, &resource);
        let head = format!("{prefix}-{resource}-");
        prop_assert!(name.starts_with(&head), "{}", name);
        let suffix = &name[head.len()..];
        prop_assert_eq!(suffix.len(), 16);
        prop_assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()), "{}", name);
    }

    /// Every scenario resource carries the category prefix.
    #[test]
    fn prop_scenario_names_are_scoped(category in "[a-z]{1,12}") {
        let names = ScenarioNames::generate(&category);
        for name in [&names.app, &names.service, &names.security_group] {
            prop_assert!(name.starts_with(&format!("{category}-")), "{}", name);
        }
        prop_assert_ne!(&names.app, &names.service);
    }
}

#[test]
fn test_names_unique_across_batch() {
    let names: std::collections::HashSet<_> = (0..200)
        .map(|_| prefixed_random_name("mariadb", "app"))
        .collect();
    assert_eq!(names.len(), 200, "duplicate names generated");
}

// ============================================================================
// Credentials
// ============================================================================

proptest! {
    /// Every valid port survives in all accepted encodings.
    #[test]
    fn prop_valid_ports_accepted(port in 1u16..=65535) {
        for raw in [
            serde_json::json!(port),
            serde_json::json!(f64::from(port)),
            serde_json::json!(port.to_string()),
        ] {
            let creds = Credentials::from_value(serde_json::json!({"host": "db", "port": raw}))
                .expect("valid credentials");
            prop_assert_eq!(creds.port, port);
        }
    }

    /// Ports outside 1..=65535 are rejected, never truncated.
    #[test]
    fn prop_out_of_range_ports_rejected(port in prop_oneof![Just(0i64), 65536i64..1_000_000, -1_000_000i64..0]) {
        let err = Credentials::from_value(serde_json::json!({"host": "db", "port": port}))
            .expect_err("port out of range");
        let is_port_error = matches!(err, CredentialsError::InvalidField { field: "port", .. });
        prop_assert!(is_port_error, "{:?}", err);
    }

    /// Extra fields are carried through untouched.
    #[test]
    fn prop_extra_fields_preserved(key in "[a-z_]{1,12}", value in "[ -~]{0,20}") {
        prop_assume!(key != "host" && key != "port");
        let creds = Credentials::from_value(
            serde_json::json!({"host": "db", "port": 1, key.clone(): value.clone()}),
        )
        .expect("valid credentials");
        prop_assert_eq!(creds.extra.get(&key), Some(&serde_json::Value::String(value)));
    }

    /// An IPv4 host always yields a single-host rule on the given port.
    #[test]
    fn prop_ipv4_rule_is_single_host(a: u8, b: u8, c: u8, d: u8, port in 1u16..=65535) {
        let address = IpAddr::V4(Ipv4Addr::new(a, b, c, d));
        let rule = SecurityRule::for_service(address, port, "svc");
        prop_assert_eq!(&rule.destination, &format!("{a}.{b}.{c}.{d}/32"));
        prop_assert_eq!(rule.destination, host_cidr(address));
        prop_assert_eq!(rule.ports, port.to_string());
    }
}
