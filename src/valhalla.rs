//! Valhalla HTTP adapter for route requests.

use tracing::{debug, warn};

use crate::error::ClientError;
use crate::route::RouteRequest;
use crate::traits::RouteProvider;

#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    /// Full route endpoint, e.g. `http://localhost:8002/route`.
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8002/route".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValhallaClient {
    config: ValhallaConfig,
    client: reqwest::blocking::Client,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for ValhallaClient {
    fn route(&self, request: &RouteRequest) -> Result<String, ClientError> {
        let body = serde_json::to_vec(request)?;
        debug!(url = %self.config.url, costing = request.costing.as_str(), "requesting route");

        let response = self
            .client
            .post(&self.config.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "routing service rejected request");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
