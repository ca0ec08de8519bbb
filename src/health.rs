//! Backend health probe

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Error;
use crate::fetch::Fetch;

/// Client for the backend health endpoint
pub struct HealthClient {
    /// The base URL for the IndiQuant API
    url: String,

    /// HTTP client used for requests
    client: Client,
}

/// Health endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` or `"down"`
    pub status: String,

    /// Server-side timestamp of the probe
    pub timestamp: String,

    /// Deployed service version
    pub version: Option<String>,

    /// Seconds since the service started
    #[serde(rename = "uptime_seconds")]
    pub uptime_seconds: Option<u64>,

    /// Per-dependency states, shape left to the server
    #[serde(default)]
    pub dependencies: HashMap<String, Value>,
}

impl HealthClient {
    /// Create a new HealthClient
    pub(crate) fn new(url: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }

    /// Probe the backend health endpoint
    pub async fn check(&self) -> Result<HealthStatus, Error> {
        let url = format!("{}/health", self.url);

        let status = Fetch::get(&self.client, &url)
            .execute::<HealthStatus>()
            .await?;

        Ok(status)
    }
}
