use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PvWattsError;

pub const PVWATTS_QUERY_URL: &str = "http://developer.nrel.gov/api/pvwatts/v5.json";
pub const DEMO_KEY: &str = "DEMO_KEY";

fn default_api_key() -> String { DEMO_KEY.to_string() }
fn default_endpoint() -> String { PVWATTS_QUERY_URL.to_string() }

/// Per-client settings, fixed once the client is built.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct ClientConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Proxy URL per scheme: `http`, `https` or `all`.
    #[serde(default)]
    pub proxies: HashMap<String, String>,
    /// Transport timeout; none means the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("proxies", &self.proxies)
            .field("timeout_secs", &self.timeout_secs)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            proxies: HashMap::new(),
            timeout_secs: None,
            endpoint: default_endpoint(),
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_proxy(mut self, scheme: impl Into<String>, url: impl Into<String>) -> Self {
        self.proxies.insert(scheme.into(), url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn load(path: &str) -> Result<Self, PvWattsError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
