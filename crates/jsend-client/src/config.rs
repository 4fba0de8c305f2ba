use jsend::ParsePolicy;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL: {url}. Must start with http:// or https://")]
    InvalidBaseUrl { url: String },

    #[error("Invalid value for {name}: {value} ({message})")]
    InvalidValue {
        name: String,
        value: String,
        message: String,
    },

    #[error("Failed to create HTTP client: {message}")]
    ClientBuildFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub parse_policy: ParsePolicy,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            parse_policy: ParsePolicy::Strict,
            user_agent: concat!("jsend-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `JSEND_BASE_URL`, `JSEND_TIMEOUT_SECS`, `JSEND_CONNECT_TIMEOUT_SECS`
    /// and `JSEND_PARSE_POLICY`, falling back to the defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("JSEND_BASE_URL") {
            config.base_url = Some(base_url);
        }
        if let Some(timeout) = read_secs("JSEND_TIMEOUT_SECS")? {
            config.timeout = timeout;
        }
        if let Some(connect_timeout) = read_secs("JSEND_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = connect_timeout;
        }
        if let Ok(policy) = env::var("JSEND_PARSE_POLICY") {
            config.parse_policy = policy.parse().map_err(|e: jsend::UnknownParsePolicy| {
                ConfigError::InvalidValue {
                    name: "JSEND_PARSE_POLICY".to_string(),
                    value: policy.clone(),
                    message: e.to_string(),
                }
            })?;
        }

        config.validate()?;
        debug!(?config, "Loaded client config from environment");
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_parse_policy(mut self, policy: ParsePolicy) -> Self {
        self.parse_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::InvalidBaseUrl {
                    url: base_url.clone(),
                });
            }
        }
        Ok(())
    }
}

fn read_secs(name: &str) -> Result<Option<Duration>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|e| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "JSEND_BASE_URL",
        "JSEND_TIMEOUT_SECS",
        "JSEND_CONNECT_TIMEOUT_SECS",
        "JSEND_PARSE_POLICY",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        env::set_var("JSEND_BASE_URL", "https://api.example.com/v1");
        env::set_var("JSEND_TIMEOUT_SECS", "5");
        env::set_var("JSEND_PARSE_POLICY", "naked");

        let config = ClientConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com/v1"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.connect_timeout,
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
        );
        assert_eq!(config.parse_policy, ParsePolicy::Naked);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        env::set_var("JSEND_TIMEOUT_SECS", "soon");
        let result = ClientConfig::from_env();
        clear_env();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        env::set_var("JSEND_PARSE_POLICY", "lenient");
        let result = ClientConfig::from_env();
        clear_env();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        env::set_var("JSEND_BASE_URL", "ftp://example.com");
        let result = ClientConfig::from_env();
        clear_env();
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }
}
