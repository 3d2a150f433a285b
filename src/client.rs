use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{PvWattsError, Result};
use crate::models::params::{ParameterSet, QueryParams};
use crate::models::result::PvWattsResult;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn user_agent() -> String {
    format!("pvwatts/{VERSION} (Rust)")
}

/// Blocking client for the PVWatts v5 API.
///
/// Each instance owns its configuration; building a second client with a
/// different key has no effect on the first.
#[derive(Debug, Clone)]
pub struct PvWatts {
    config: ClientConfig,
    http: Client,
}

impl PvWatts {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&user_agent())
            .map_err(|e| PvWattsError::Config(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let mut builder = Client::builder().default_headers(headers);
        for (scheme, url) in &config.proxies {
            let proxy = match scheme.as_str() {
                "http" => reqwest::Proxy::http(url.as_str()),
                "https" => reqwest::Proxy::https(url.as_str()),
                "all" => reqwest::Proxy::all(url.as_str()),
                other => {
                    return Err(PvWattsError::Config(format!(
                        "unsupported proxy scheme '{other}' (expected http, https or all)"
                    )));
                }
            }
            .map_err(|e| PvWattsError::Config(format!("invalid {scheme} proxy '{url}': {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build()?;
        debug!(endpoint = %config.endpoint, proxies = config.proxies.len(), "PVWatts client ready");
        Ok(Self { config, http })
    }

    /// Client with the public demo key and no proxy.
    pub fn demo() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Validate `params`, add the API key and fetch one estimate.
    ///
    /// Nothing is sent when a parameter fails validation.
    pub fn request(&self, params: &ParameterSet) -> Result<PvWattsResult> {
        let mut query = params.to_query()?;
        query.insert("api_key".to_string(), self.config.api_key.clone());

        let body = self.get_data(&query)?;
        if let Some(warnings) = body.get("warnings").and_then(Value::as_array) {
            for w in warnings {
                warn!(warning = %w, "PVWatts returned a warning");
            }
        }
        Ok(PvWattsResult::new(body))
    }

    /// Send an already assembled query and decode the JSON reply.
    ///
    /// Only 403 is mapped to an error here; any other status is decoded like a
    /// success and left to the caller to inspect.
    pub fn get_data(&self, params: &QueryParams) -> Result<Value> {
        debug!(
            endpoint = %self.config.endpoint,
            query = ?redacted(params),
            "PVWatts GET"
        );

        let response = self
            .http
            .get(self.config.endpoint.as_str())
            .query(params)
            .send()?;

        let status = response.status();
        info!(status = status.as_u16(), "PVWatts response");
        if status == StatusCode::FORBIDDEN {
            warn!("PVWatts rejected the request (403), check the API key");
            return Err(PvWattsError::Remote("Forbidden, 403".to_string()));
        }

        Ok(response.json::<Value>()?)
    }
}

fn redacted(params: &QueryParams) -> QueryParams {
    let mut shown = params.clone();
    if let Some(key) = shown.get_mut("api_key") {
        *key = "***".to_string();
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_names_client_and_version() {
        assert_eq!(user_agent(), format!("pvwatts/{} (Rust)", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn unknown_proxy_scheme_is_rejected() {
        let config = ClientConfig::default().with_proxy("ftp", "http://proxy:21");
        assert!(matches!(PvWatts::new(config), Err(PvWattsError::Config(_))));
    }

    #[test]
    fn malformed_proxy_url_is_rejected() {
        let config = ClientConfig::default().with_proxy("https", "not a url");
        assert!(matches!(PvWatts::new(config), Err(PvWattsError::Config(_))));
    }

    #[test]
    fn proxies_are_accepted_per_scheme() {
        let config = ClientConfig::default()
            .with_proxy("http", "http://10.10.1.10:3128")
            .with_proxy("https", "http://10.10.1.10:1080")
            .with_timeout_secs(10);
        assert!(PvWatts::new(config).is_ok());
    }

    #[test]
    fn demo_client_uses_public_key() {
        let client = PvWatts::demo().unwrap();
        assert_eq!(client.config().api_key, crate::config::DEMO_KEY);
        assert_eq!(client.version(), VERSION);
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = PvWatts::new(ClientConfig::new("very-secret-key")).unwrap();
        let shown = format!("{client:?}");
        assert!(!shown.contains("very-secret-key"), "{shown}");
        assert!(shown.contains("***"));
    }

    #[test]
    fn api_key_is_hidden_in_logs() {
        let mut query = QueryParams::new();
        query.insert("api_key".into(), "secret".into());
        query.insert("lat".into(), "40".into());
        let shown = redacted(&query);
        assert_eq!(shown["api_key"], "***");
        assert_eq!(shown["lat"], "40");
    }

    #[test]
    fn invalid_params_fail_before_any_request() {
        // Unroutable endpoint: reaching the network would be a transport error.
        let client = PvWatts::new(ClientConfig::default().with_endpoint("http://127.0.0.1:9/v5.json"))
            .unwrap();
        let params = ParameterSet {
            tilt: Some(91.0),
            ..ParameterSet::default()
        };
        assert!(matches!(
            client.request(&params),
            Err(PvWattsError::Validation(e)) if e.field == "tilt"
        ));
    }
}
