//! Process configuration.
//!
//! Everything comes from the environment (a `.env` file is loaded into it
//! first, if present). Account credentials and the OAuth client are required;
//! everything else has a default.

use std::time::Duration;

use alarmstop_core::api::client::{
    DEFAULT_APP_API_URL, DEFAULT_CLIENT_API_URL, REQUEST_TIMEOUT_SECS,
};
use alarmstop_core::{BearerPolicy, Credentials};
use thiserror::Error;

/// Default port for the trigger endpoint
const DEFAULT_PORT: u16 = 3000;

const REQUIRED_VARS: [&str; 4] = ["EMAIL", "PASSWORD", "CLIENT_ID", "CLIENT_SECRET"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub port: u16,
    pub client_api_url: String,
    pub app_api_url: String,
    pub request_timeout: Duration,
    pub bearer_policy: BearerPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|&name| get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let [email, password, client_id, client_secret] =
            REQUIRED_VARS.map(|name| get(name).unwrap_or_default());

        let port = match get("PORT") {
            Some(value) => parse_var("PORT", value)?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REQUEST_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => REQUEST_TIMEOUT_SECS,
        };

        let bearer_policy = match get("BEARER_REFRESH") {
            Some(value) => parse_var("BEARER_REFRESH", value)?,
            None => BearerPolicy::default(),
        };

        Ok(Self {
            credentials: Credentials::new(email, password, client_id, client_secret),
            port,
            client_api_url: get("CLIENT_API_URL")
                .unwrap_or_else(|| DEFAULT_CLIENT_API_URL.to_string()),
            app_api_url: get("APP_API_URL").unwrap_or_else(|| DEFAULT_APP_API_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            bearer_policy,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("EMAIL", "a@b.com"),
        ("PASSWORD", "x"),
        ("CLIENT_ID", "cid"),
        ("CLIENT_SECRET", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).expect("valid config");
        assert_eq!(config.port, 3000);
        assert_eq!(config.client_api_url, "https://client-api.8slp.net/v1/");
        assert_eq!(config.app_api_url, "https://app-api.8slp.net/v1/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.bearer_policy, BearerPolicy::EveryCall);
        assert_eq!(config.credentials.email(), "a@b.com");
    }

    #[test]
    fn test_missing_vars_reported_together() {
        let err = Config::from_lookup(lookup(&[("EMAIL", "a@b.com"), ("PASSWORD", " ")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["PASSWORD", "CLIENT_ID", "CLIENT_SECRET"])
        );
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: PASSWORD, CLIENT_ID, CLIENT_SECRET"
        );
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("BEARER_REFRESH", "on-login"),
            ("CLIENT_API_URL", "http://localhost:9000/v1/"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).expect("valid config");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.bearer_policy, BearerPolicy::OnLogin);
        assert_eq!(config.client_api_url, "http://localhost:9000/v1/");
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid { name: "PORT", value: "eighty".to_string() }
        );

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("REQUEST_TIMEOUT_SECS", "0"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid { name: "REQUEST_TIMEOUT_SECS", .. }
        ));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BEARER_REFRESH", "never"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)).unwrap_err(),
            ConfigError::Invalid { name: "BEARER_REFRESH", .. }
        ));
    }
}
