//! Explicit schema for service instance credentials.
//!
//! Credentials come back from the platform as an untyped JSON object. Only
//! `host` and `port` are interpreted; everything else is carried along
//! untouched in `extra`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::error::CredentialsError;

/// Connection details of a provisioned service instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub host: String,
    pub port: u16,
    pub extra: BTreeMap<String, Value>,
}

impl Credentials {
    /// Validate an untyped credentials value.
    ///
    /// `port` is accepted as a JSON integer, an integral JSON float
    /// (`5432.0`) or a decimal string (`"5432"`), and must be in `1..=65535`.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialsError`] when the value is not an object or when
    /// `host`/`port` are missing or mistyped.
    pub fn from_value(value: Value) -> Result<Self, CredentialsError> {
        let Value::Object(mut map) = value else {
            return Err(CredentialsError::NotAnObject);
        };
        let host = parse_host(map.remove("host"))?;
        let port = parse_port(map.remove("port"))?;
        Ok(Self {
            host,
            port,
            extra: map.into_iter().collect(),
        })
    }

    /// Parse the stdout of `cf service-key`.
    ///
    /// The CLI prints a status line before the JSON body, and newer CLI
    /// versions wrap the body in a `credentials` object. Both layouts are
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialsError`] if no JSON object is found or it fails
    /// validation.
    pub fn from_service_key_output(stdout: &str) -> Result<Self, CredentialsError> {
        let start = stdout
            .find('{')
            .ok_or_else(|| CredentialsError::Unparseable("no JSON object in output".to_string()))?;
        let value: Value = serde_json::from_str(&stdout[start..])
            .map_err(|e| CredentialsError::Unparseable(e.to_string()))?;
        Self::from_value(unwrap_credentials(value))
    }
}

fn unwrap_credentials(value: Value) -> Value {
    match value {
        Value::Object(mut map) if !map.contains_key("host") => match map.remove("credentials") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                map.insert("credentials".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn parse_host(value: Option<Value>) -> Result<String, CredentialsError> {
    match value {
        None | Some(Value::Null) => Err(CredentialsError::MissingField("host")),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CredentialsError::InvalidField {
            field: "host",
            reason: "empty string".to_string(),
        }),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(CredentialsError::InvalidField {
            field: "host",
            reason: format!("expected a string, got {}", type_name(&other)),
        }),
    }
}

fn parse_port(value: Option<Value>) -> Result<u16, CredentialsError> {
    let invalid = |reason: String| CredentialsError::InvalidField {
        field: "port",
        reason,
    };
    let raw: u64 = match value {
        None | Some(Value::Null) => return Err(CredentialsError::MissingField("port")),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                v
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u16::MAX) => {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let v = f as u64;
                        v
                    }
                    _ => return Err(invalid(format!("{n} is not a valid port number"))),
                }
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(format!("'{s}' is not a valid port number")))?,
        Some(other) => {
            return Err(invalid(format!(
                "expected a number, got {}",
                type_name(&other)
            )));
        }
    };
    match u16::try_from(raw) {
        Ok(0) | Err(_) => Err(invalid(format!("{raw} is out of range 1-65535"))),
        Ok(port) => Ok(port),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
