//! Billing backend client.
//!
//! Reporting is fail-silent (`false` on any failure) and the quota check is
//! fail-open (`true` whenever the backend can't answer), so a billing outage
//! never blocks a chat turn. Only an explicit `remaining <= 0` blocks.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::usage::{TokenUsage, UsageTracker};

/// Usage resource path, relative to the billing base URL.
const USAGE_PATH: &str = "/api/v1/usage/tokens";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("billing request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("billing backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed billing response: {0}")]
    Malformed(String),
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// Current-period quota as reported by the billing backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSnapshot {
    pub used: i64,
    pub included: i64,
    pub remaining: i64,
    #[serde(default)]
    pub period_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub overage_count: i64,
}

impl UsageSnapshot {
    pub fn tracker(&self) -> UsageTracker {
        UsageTracker::new(self.included, self.used)
    }
}

/// The backend answers either with the bare snapshot or `{ "data": … }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum UsagePayload {
    Wrapped { data: UsageSnapshot },
    Bare(UsageSnapshot),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageReport<'a> {
    #[serde(flatten)]
    usage: &'a TokenUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

// ─────────────────────────────────────────────
// BillingClient
// ─────────────────────────────────────────────

/// Authenticated client for the caller's organization quota.
pub struct BillingClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl BillingClient {
    /// `token` is the caller's bearer JWT.
    pub fn new(base_url: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn usage_url(&self) -> String {
        format!("{}{}", self.base_url, USAGE_PATH)
    }

    /// Record consumption. Returns `false` on any failure; never errors.
    pub async fn report_token_usage(&self, usage: &TokenUsage, model: Option<&str>) -> bool {
        let body = UsageReport { usage, model };

        let result = self
            .client
            .post(self.usage_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {
                debug!(total_tokens = usage.total_tokens, "reported token usage");
                true
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "billing backend rejected usage report");
                false
            }
            Err(e) => {
                warn!(error = %e, "failed to report token usage");
                false
            }
        }
    }

    /// Fetch the current period's usage snapshot.
    pub async fn get_token_usage(&self) -> Result<UsageSnapshot, BillingError> {
        let resp = self
            .client
            .get(self.usage_url())
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BillingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: UsagePayload = resp
            .json()
            .await
            .map_err(|e| BillingError::Malformed(e.to_string()))?;

        Ok(match payload {
            UsagePayload::Wrapped { data } => data,
            UsagePayload::Bare(snapshot) => snapshot,
        })
    }

    /// Whether the organization may keep chatting.
    ///
    /// Fails open: any error fetching the snapshot allows usage.
    pub async fn has_remaining_tokens(&self) -> bool {
        match self.get_token_usage().await {
            Ok(snapshot) => snapshot.remaining > 0,
            Err(e) => {
                warn!(error = %e, "usage check failed, allowing request");
                true
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::calculate_total_tokens;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot_json(used: i64, included: i64, remaining: i64) -> serde_json::Value {
        json!({
            "used": used,
            "included": included,
            "remaining": remaining,
            "periodStart": "2026-10-01T00:00:00Z",
            "periodEnd": "2026-11-01T00:00:00Z",
            "overageCount": 0
        })
    }

    async fn mount_usage(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(USAGE_PATH))
            .and(header("Authorization", "Bearer jwt-1"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_report_usage_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(USAGE_PATH))
            .and(header("Authorization", "Bearer jwt-1"))
            .and(body_json(json!({
                "inputTokens": 120,
                "outputTokens": 30,
                "totalTokens": 150,
                "model": "gpt-4o-mini"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = BillingClient::new(&server.uri(), "jwt-1");
        let ok = client
            .report_token_usage(&calculate_total_tokens(120, 30), Some("gpt-4o-mini"))
            .await;
        assert!(ok);
    }

    #[tokio::test]
    async fn test_report_usage_failure_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(USAGE_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = BillingClient::new(&server.uri(), "jwt-1");
        assert!(!client.report_token_usage(&calculate_total_tokens(1, 1), None).await);

        let unreachable = BillingClient::new("http://127.0.0.1:1", "jwt-1");
        assert!(!unreachable.report_token_usage(&calculate_total_tokens(1, 1), None).await);
    }

    #[tokio::test]
    async fn test_get_token_usage_bare_and_wrapped() {
        let server = MockServer::start().await;
        mount_usage(
            &server,
            ResponseTemplate::new(200).set_body_json(snapshot_json(1_500, 10_000, 8_500)),
        )
        .await;
        let snapshot = BillingClient::new(&server.uri(), "jwt-1")
            .get_token_usage()
            .await
            .unwrap();
        assert_eq!(snapshot.remaining, 8_500);
        assert!(snapshot.period_start.is_some());
        assert_eq!(snapshot.tracker().remaining, 8_500);

        let wrapped = MockServer::start().await;
        mount_usage(
            &wrapped,
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": snapshot_json(12_000, 10_000, -2_000)})),
        )
        .await;
        let snapshot = BillingClient::new(&wrapped.uri(), "jwt-1")
            .get_token_usage()
            .await
            .unwrap();
        assert_eq!(snapshot.used, 12_000);
        assert!(snapshot.tracker().is_over_limit());
    }

    #[tokio::test]
    async fn test_get_token_usage_errors() {
        let server = MockServer::start().await;
        mount_usage(&server, ResponseTemplate::new(401).set_body_string("expired token")).await;
        let err = BillingClient::new(&server.uri(), "jwt-1")
            .get_token_usage()
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Status { status: 401, .. }));

        let garbage = MockServer::start().await;
        mount_usage(&garbage, ResponseTemplate::new(200).set_body_string("<html>")).await;
        let err = BillingClient::new(&garbage.uri(), "jwt-1")
            .get_token_usage()
            .await
            .unwrap_err();
        assert!(matches!(err, BillingError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_has_remaining_tokens_fails_open_when_unreachable() {
        let client = BillingClient::new("http://127.0.0.1:1", "jwt-1");
        assert!(client.has_remaining_tokens().await);
    }

    #[tokio::test]
    async fn test_has_remaining_tokens_fails_open_on_server_error() {
        let server = MockServer::start().await;
        mount_usage(&server, ResponseTemplate::new(500)).await;
        assert!(BillingClient::new(&server.uri(), "jwt-1").has_remaining_tokens().await);
    }

    #[tokio::test]
    async fn test_has_remaining_tokens_blocks_on_zero() {
        let server = MockServer::start().await;
        mount_usage(
            &server,
            ResponseTemplate::new(200).set_body_json(snapshot_json(10_000, 10_000, 0)),
        )
        .await;
        assert!(!BillingClient::new(&server.uri(), "jwt-1").has_remaining_tokens().await);
    }

    #[tokio::test]
    async fn test_has_remaining_tokens_allows_positive() {
        let server = MockServer::start().await;
        mount_usage(
            &server,
            ResponseTemplate::new(200).set_body_json(snapshot_json(10, 10_000, 9_990)),
        )
        .await;
        assert!(BillingClient::new(&server.uri(), "jwt-1").has_remaining_tokens().await);
    }
}
