//! Authenticated HTTP client for the case-management backend.
//!
//! One instance per request: it carries the caller's bearer JWT and must not
//! be shared across users.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::Response;
use serde_json::Value;
use tracing::debug;

use amlassist_core::config::BackendConfig;

use super::base::ToolError;

pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BackendClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn from_config(config: &BackendConfig, token: &str) -> Self {
        Self::new(
            &config.api_url,
            token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET path?query` and parse the JSON body.
    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ToolError> {
        debug!(path = %path, params = query.len(), "backend GET");
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        read_json(resp).await
    }

    /// `POST path` with a multipart body and parse the JSON response.
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Value, ToolError> {
        debug!(path = %path, "backend multipart POST");
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;
        read_json(resp).await
    }
}

async fn read_json(resp: Response) -> Result<Value, ToolError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ToolError::status(status.as_u16(), &body));
    }
    resp.json::<Value>()
        .await
        .map_err(|e| ToolError::Malformed(e.to_string()))
}
