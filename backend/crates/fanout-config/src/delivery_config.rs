use crate::{ConfigError, ConfigErrorResult};

use std::str::FromStr;

use serde::Deserialize;

pub const MIN_TIMEOUT_MS: u64 = 10;
pub const MAX_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;

pub const DEFAULT_ENDPOINT_SCHEME: &str = "http";

/// Which push primitive a broadcast uses to reach a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Sockets held by this process
    #[default]
    Local,
    /// A management endpoint addressed by the request's domain and stage;
    /// the domain must be listed in `allowed_domains`
    Http,
}

impl FromStr for DeliveryMode {
    type Err = ConfigError;

    #[track_caller]
    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::delivery(format!(
                "delivery.mode must be \"local\" or \"http\", got {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    pub mode: DeliveryMode,
    /// Scheme used to reach `{domain}/{stage}` in http mode
    pub endpoint_scheme: String,
    /// Per-delivery request timeout in http mode
    pub timeout_ms: u64,
    /// `host[:port]` values a broadcast may address in http mode
    pub allowed_domains: Vec<String>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::default(),
            endpoint_scheme: String::from(DEFAULT_ENDPOINT_SCHEME),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            allowed_domains: Vec::new(),
        }
    }
}

impl DeliveryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.endpoint_scheme != "http" && self.endpoint_scheme != "https" {
            return Err(ConfigError::delivery(format!(
                "delivery.endpoint_scheme must be http or https, got {:?}",
                self.endpoint_scheme
            )));
        }

        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::delivery(format!(
                "delivery.timeout_ms must be {}-{}, got {}",
                MIN_TIMEOUT_MS, MAX_TIMEOUT_MS, self.timeout_ms
            )));
        }

        for domain in &self.allowed_domains {
            if domain.is_empty()
                || domain.contains(['/', '@'])
                || domain.contains(char::is_whitespace)
            {
                return Err(ConfigError::delivery(format!(
                    "delivery.allowed_domains entries must be host[:port], got {domain:?}"
                )));
            }
        }

        if self.mode == DeliveryMode::Http && self.allowed_domains.is_empty() {
            return Err(ConfigError::delivery(
                "delivery.allowed_domains must name at least one endpoint in http mode",
            ));
        }

        Ok(())
    }

    /// Whether a request-supplied domain names an allowed endpoint
    pub fn is_allowed_domain(&self, domain: &str) -> bool {
        self.allowed_domains
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(domain))
    }
}
