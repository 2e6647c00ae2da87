use crate::auth::Credentials;
use connectors_common::{ConnectorError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.bitstamp.net";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitstampConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for BitstampConfig {
    fn default() -> Self {
        BitstampConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl BitstampConfig {
    /// Reads `BITSTAMP_BASE_URL` and `BITSTAMP_TIMEOUT_SECS`, falling back to
    /// the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = BitstampConfig::default();
        if let Some(url) = lookup("BITSTAMP_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConnectorError::Config(format!("BITSTAMP_BASE_URL is not an http(s) url: {:?}", url)));
            }
            config.base_url = url.to_string();
        }
        if let Some(secs) = lookup("BITSTAMP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| ConnectorError::Config(format!("BITSTAMP_TIMEOUT_SECS {:?}: {}", secs, e)))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl Credentials {
    /// Reads `BITSTAMP_API_KEY`, `BITSTAMP_API_SECRET` and
    /// `BITSTAMP_CUSTOMER_ID`. `Ok(None)` when none is set; an error when only
    /// some are.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>> {
        let key = lookup("BITSTAMP_API_KEY");
        let secret = lookup("BITSTAMP_API_SECRET");
        let customer = lookup("BITSTAMP_CUSTOMER_ID");
        match (key, secret, customer) {
            (None, None, None) => Ok(None),
            (Some(key), Some(secret), Some(customer)) => {
                if secret.is_empty() {
                    return Err(ConnectorError::Config("BITSTAMP_API_SECRET is empty".to_string()));
                }
                Ok(Some(Credentials::new(&key, &secret, &customer)))
            }
            _ => Err(ConnectorError::Config(
                "BITSTAMP_API_KEY, BITSTAMP_API_SECRET and BITSTAMP_CUSTOMER_ID must be set together".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = BitstampConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BitstampConfig::default());
        assert_eq!(config.base_url, "https://www.bitstamp.net");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn overrides() {
        let config = BitstampConfig::from_lookup(lookup(&[
            ("BITSTAMP_BASE_URL", "http://localhost:8080/"),
            ("BITSTAMP_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let bad_timeout = BitstampConfig::from_lookup(lookup(&[("BITSTAMP_TIMEOUT_SECS", "soon")]));
        assert!(matches!(bad_timeout, Err(ConnectorError::Config(_))));
        let bad_url = BitstampConfig::from_lookup(lookup(&[("BITSTAMP_BASE_URL", "www.bitstamp.net")]));
        assert!(matches!(bad_url, Err(ConnectorError::Config(_))));
    }

    #[test]
    fn credentials_all_or_nothing() {
        assert!(Credentials::from_lookup(lookup(&[])).unwrap().is_none());

        let creds = Credentials::from_lookup(lookup(&[
            ("BITSTAMP_API_KEY", "KEY"),
            ("BITSTAMP_API_SECRET", "SECRET"),
            ("BITSTAMP_CUSTOMER_ID", "CID"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(creds, Credentials::new("KEY", "SECRET", "CID"));

        let partial = Credentials::from_lookup(lookup(&[("BITSTAMP_API_KEY", "KEY")]));
        assert!(matches!(partial, Err(ConnectorError::Config(_))));

        let empty_secret = Credentials::from_lookup(lookup(&[
            ("BITSTAMP_API_KEY", "KEY"),
            ("BITSTAMP_API_SECRET", ""),
            ("BITSTAMP_CUSTOMER_ID", "CID"),
        ]));
        assert!(matches!(empty_secret, Err(ConnectorError::Config(_))));
    }
}
