use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    Production,
    #[serde(rename = "Disaster Recovery")]
    DisasterRecovery,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "Production",
            Environment::DisasterRecovery => "Disaster Recovery",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "disaster recovery" | "dr" => Ok(Environment::DisasterRecovery),
            other => Err(format!("Unknown environment: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerAsset {
    pub id: i32,
    pub hostname: String,
    pub ip_address: String,
    pub environment: String,
    pub segment: String,
    pub os: Option<String>,
    pub owner: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
}

/// Validated create/edit payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerInput {
    pub hostname: String,
    pub ip_address: String,
    pub environment: Environment,
    pub segment: String,
    pub os: Option<String>,
    pub owner: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFilter {
    pub segment: Option<String>,
    pub environment: Option<String>,
    /// Hostname substring
    pub keyword: Option<String>,
}

/// Raw create/edit form, as posted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerForm {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub segment: String,
    pub os: Option<String>,
    pub owner: Option<String>,
    pub cpu: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerForm {
    /// Check required fields and normalize optional ones.
    pub fn validate(self) -> Result<ServerInput, String> {
        let hostname = self.hostname.trim();
        if hostname.is_empty() {
            return Err("Hostname is required".to_string());
        }

        let ip_address = self.ip_address.trim();
        if ip_address.parse::<IpAddr>().is_err() {
            return Err(format!("Invalid IP address: '{ip_address}'"));
        }

        let environment: Environment = self.environment.parse()?;

        let segment = self.segment.trim().to_uppercase();
        if segment.is_empty() {
            return Err("Segment is required".to_string());
        }

        Ok(ServerInput {
            hostname: hostname.to_string(),
            ip_address: ip_address.to_string(),
            environment,
            segment,
            os: optional(self.os),
            owner: optional(self.owner),
            cpu: optional(self.cpu),
            ram: optional(self.ram),
            storage: optional(self.storage),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ServerForm {
        ServerForm {
            hostname: " db-01 ".to_string(),
            ip_address: "10.0.0.5".to_string(),
            environment: "Production".to_string(),
            segment: "db".to_string(),
            cpu: Some("8 cores".to_string()),
            ram: Some("  ".to_string()),
            ..ServerForm::default()
        }
    }

    #[test]
    fn test_environment_names() {
        assert_eq!("Production".parse(), Ok(Environment::Production));
        assert_eq!("dr".parse(), Ok(Environment::DisasterRecovery));
        assert_eq!(
            "Disaster Recovery".parse(),
            Ok(Environment::DisasterRecovery)
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_form_validation_normalizes() {
        let input = form().validate().unwrap();
        assert_eq!(input.hostname, "db-01");
        assert_eq!(input.segment, "DB");
        assert_eq!(input.cpu.as_deref(), Some("8 cores"));
        assert_eq!(input.ram, None);
    }

    #[test]
    fn test_form_validation_rejects() {
        let mut bad_ip = form();
        bad_ip.ip_address = "10.0.0".to_string();
        assert!(bad_ip.validate().is_err());

        let mut no_host = form();
        no_host.hostname = "   ".to_string();
        assert_eq!(no_host.validate().unwrap_err(), "Hostname is required");

        let mut bad_env = form();
        bad_env.environment = "QA".to_string();
        assert!(bad_env.validate().is_err());
    }
}
