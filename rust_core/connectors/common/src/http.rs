//! Minimal GET transport shared by the REST connectors.

use crate::errors::{ConnectorError, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// `get(url, headers) -> body`. Implementations report every failure
/// (connect, timeout, non-2xx status) as `ConnectorError::Network`.
#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>>;
}

/// `HttpGet` backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestGet {
    client: Client,
    timeout: Duration,
}

impl ReqwestGet {
    pub fn new(timeout: Duration) -> Self {
        ReqwestGet { client: Client::new(), timeout }
    }

    pub fn with_client(client: Client, timeout: Duration) -> Self {
        ReqwestGet { client, timeout }
    }
}

impl Default for ReqwestGet {
    fn default() -> Self {
        ReqwestGet::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl HttpGet for ReqwestGet {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        debug!("GET {}", url);
        let mut req = self.client.get(url).timeout(self.timeout);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await.map_err(|e| {
            warn!("GET {} failed: {}", url, e);
            ConnectorError::Network(format!("GET {}: {}", url, e))
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(ConnectorError::Network(format!("GET {}: HTTP {}", url, status)));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ConnectorError::Network(format!("GET {}: reading body: {}", url, e)))?;
        Ok(body.to_vec())
    }
}
