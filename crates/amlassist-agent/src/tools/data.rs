//! Read-only data tools over the case-management backend.
//!
//! Each tool is a [`DataQuery`] (typed input, request builder, summarizer)
//! wrapped in the generic [`DataTool`]. Listings come back from the backend as
//! `{ data: [...], pagination: { total, page, limit, totalPages } }` and are
//! reduced to a count line plus one bullet per record on the page.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::backend::BackendClient;
use super::base::{lenient_count, lenient_text, parse_input, Tool, ToolError};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Query-string pairs for a backend request.
pub type Query = Vec<(&'static str, String)>;

/// Declares a closed set of filter values with their wire names.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }
    };
}

wire_enum!(PersonType {
    Physical => "physical",
    Moral => "moral",
    Trust => "trust",
});

wire_enum!(OperationType {
    Deposit => "deposit",
    Withdrawal => "withdrawal",
    Transfer => "transfer",
    Purchase => "purchase",
    Sale => "sale",
});

wire_enum!(AlertStatus {
    Detected => "DETECTED",
    FileGenerated => "FILE_GENERATED",
    Submitted => "SUBMITTED",
    Overdue => "OVERDUE",
    Cancelled => "CANCELLED",
});

wire_enum!(AlertSeverity {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
    Critical => "CRITICAL",
});

wire_enum!(ReportStatus {
    Draft => "DRAFT",
    Generated => "GENERATED",
    Submitted => "SUBMITTED",
});

wire_enum!(StatsResource {
    Clients => "clients",
    Transactions => "transactions",
    Alerts => "alerts",
    Reports => "reports",
});

// ─────────────────────────────────────────────
// DataQuery / DataTool
// ─────────────────────────────────────────────

/// One read-only backend query exposed to the model.
pub trait DataQuery: Send + Sync + 'static {
    type Input: DeserializeOwned + Send;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn parameters() -> Value;

    /// Resource path and query parameters for `input`.
    fn request(input: &Self::Input) -> Result<(String, Query), ToolError>;

    /// Reduce the backend response to text for the model.
    fn summarize(input: &Self::Input, body: Value) -> Result<String, ToolError>;
}

/// A [`Tool`] performing a single authenticated `GET` for `Q`.
pub struct DataTool<Q> {
    backend: Arc<BackendClient>,
    _query: PhantomData<fn() -> Q>,
}

impl<Q: DataQuery> DataTool<Q> {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self {
            backend,
            _query: PhantomData,
        }
    }

    async fn run(&self, params: HashMap<String, Value>) -> Result<String, ToolError> {
        let input: Q::Input = parse_input(params)?;
        let (path, query) = Q::request(&input)?;
        let body = self.backend.get_json(&path, &query).await?;
        Q::summarize(&input, body)
    }
}

#[async_trait]
impl<Q: DataQuery> Tool for DataTool<Q> {
    fn name(&self) -> &str {
        Q::NAME
    }

    fn description(&self) -> &str {
        Q::DESCRIPTION
    }

    fn parameters(&self) -> Value {
        Q::parameters()
    }

    async fn execute(&self, params: HashMap<String, Value>) -> String {
        match self.run(params).await {
            Ok(summary) => {
                debug!(tool = Q::NAME, len = summary.len(), "data tool succeeded");
                summary
            }
            Err(e) => {
                warn!(tool = Q::NAME, error = %e, "data tool failed");
                e.render()
            }
        }
    }
}

pub type SearchClientsTool = DataTool<SearchClients>;
pub type ListTransactionsTool = DataTool<ListTransactions>;
pub type ListAlertsTool = DataTool<ListAlerts>;
pub type ListReportsTool = DataTool<ListReports>;
pub type GetStatsTool = DataTool<GetStats>;

// ─────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────

/// `limit` / `page` shared by every listing tool.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl PageParams {
    /// Validate bounds and start a query with `limit` and `page`.
    fn query(&self) -> Result<Query, ToolError> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ToolError::InvalidInput(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
            )));
        }
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ToolError::InvalidInput("page must be at least 1".into()));
        }
        Ok(vec![("limit", limit.to_string()), ("page", page.to_string())])
    }
}

/// Object schema with `limit`/`page` added to `properties`.
fn listing_schema(mut properties: Value) -> Value {
    if let Some(props) = properties.as_object_mut() {
        props.insert(
            "limit".into(),
            json!({
                "type": "integer",
                "description": format!("Results per page (1-{MAX_PAGE_SIZE}, default {DEFAULT_PAGE_SIZE})"),
                "minimum": 1,
                "maximum": MAX_PAGE_SIZE,
                "default": DEFAULT_PAGE_SIZE
            }),
        );
        props.insert(
            "page".into(),
            json!({
                "type": "integer",
                "description": "Page number, starting at 1",
                "minimum": 1,
                "default": 1
            }),
        );
    }
    json!({ "type": "object", "properties": properties, "required": [] })
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Pagination {
    #[serde(deserialize_with = "lenient_count")]
    total: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    page: Option<u32>,
    #[serde(deserialize_with = "lenient_count")]
    total_pages: Option<u32>,
}

/// Render a listing as a count line plus one bullet per record.
fn summarize_listing<T: DeserializeOwned>(
    body: Value,
    noun: &str,
    line: fn(&T) -> String,
) -> Result<String, ToolError> {
    let listing: Listing<T> =
        serde_json::from_value(body).map_err(|e| ToolError::Malformed(e.to_string()))?;

    if listing.data.is_empty() {
        return Ok(format!("No {noun} found matching those filters."));
    }

    let shown = listing.data.len();
    let pagination = listing.pagination.unwrap_or_default();
    let page = pagination.page.unwrap_or(1).max(1);
    let total_pages = pagination.total_pages.unwrap_or(page).max(page);
    let total = pagination.total.unwrap_or(shown as u64).max(shown as u64);

    let mut out = format!(
        "Found {} {} (page {} of {}). Showing {}:",
        total, noun, page, total_pages, shown
    );
    for record in &listing.data {
        out.push_str("\n- ");
        out.push_str(&line(record));
    }
    if page < total_pages {
        out.push_str(&format!("\nMore results are available; request page {}.", page + 1));
    }
    Ok(out)
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or("-")
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────
// search_clients
// ─────────────────────────────────────────────

pub struct SearchClients;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchClientsInput {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub person_type: Option<PersonType>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClientRecord {
    #[serde(deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    first_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    last_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    business_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    person_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    rfc: Option<String>,
}

impl ClientRecord {
    fn display_name(&self) -> String {
        if let Some(business) = self.business_name.as_deref().filter(|s| !s.is_empty()) {
            return business.to_string();
        }
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            "(unnamed)".to_string()
        } else {
            full
        }
    }
}

impl DataQuery for SearchClients {
    type Input = SearchClientsInput;

    const NAME: &'static str = "search_clients";
    const DESCRIPTION: &'static str = "Search the organization's clients by name or RFC, optionally \
        filtered by person type. Use this to find a client's id before looking up their \
        transactions or alerts.";

    fn parameters() -> Value {
        listing_schema(json!({
            "search": {
                "type": "string",
                "description": "Free-text match on name, business name, or RFC"
            },
            "personType": {
                "type": "string",
                "enum": PersonType::VALUES,
                "description": "physical = individual, moral = company, trust = trust"
            }
        }))
    }

    fn request(input: &Self::Input) -> Result<(String, Query), ToolError> {
        let mut query = input.page.query()?;
        if let Some(search) = input.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(person_type) = input.person_type {
            query.push(("personType", person_type.as_str().to_string()));
        }
        Ok(("/api/v1/clients".to_string(), query))
    }

    fn summarize(_input: &Self::Input, body: Value) -> Result<String, ToolError> {
        summarize_listing(body, "clients", |c: &ClientRecord| {
            format!(
                "{} (RFC: {}, {}) [id: {}]",
                c.display_name(),
                text(&c.rfc),
                text(&c.person_type),
                text(&c.id)
            )
        })
    }
}

// ─────────────────────────────────────────────
// list_transactions
// ─────────────────────────────────────────────

pub struct ListTransactions;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsInput {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub operation_type: Option<OperationType>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TransactionRecord {
    #[serde(deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    client_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    operation_type: Option<String>,
    amount: Value,
    #[serde(deserialize_with = "lenient_text")]
    currency: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    operation_date: Option<String>,
}

impl DataQuery for ListTransactions {
    type Input = ListTransactionsInput;

    const NAME: &'static str = "list_transactions";
    const DESCRIPTION: &'static str = "List recorded transactions (operations), newest first, \
        optionally for a single client or a single operation type.";

    fn parameters() -> Value {
        listing_schema(json!({
            "clientId": {
                "type": "string",
                "description": "Only transactions of this client id"
            },
            "operationType": {
                "type": "string",
                "enum": OperationType::VALUES
            }
        }))
    }

    fn request(input: &Self::Input) -> Result<(String, Query), ToolError> {
        let mut query = input.page.query()?;
        if let Some(client_id) = input.client_id.as_deref().filter(|s| !s.is_empty()) {
            query.push(("clientId", client_id.to_string()));
        }
        if let Some(op) = input.operation_type {
            query.push(("operationType", op.as_str().to_string()));
        }
        Ok(("/api/v1/transactions".to_string(), query))
    }

    fn summarize(_input: &Self::Input, body: Value) -> Result<String, ToolError> {
        summarize_listing(body, "transactions", |t: &TransactionRecord| {
            format!(
                "{}: {} of {} {} for client {} [id: {}]",
                text(&t.operation_date),
                text(&t.operation_type),
                scalar(&t.amount),
                text(&t.currency),
                text(&t.client_id),
                text(&t.id)
            )
        })
    }
}

// ─────────────────────────────────────────────
// list_alerts
// ─────────────────────────────────────────────

pub struct ListAlerts;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlertsInput {
    #[serde(default)]
    pub status: Option<AlertStatus>,
    #[serde(default)]
    pub severity: Option<AlertSeverity>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AlertRecord {
    #[serde(deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    severity: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    client_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    created_at: Option<String>,
}

impl DataQuery for ListAlerts {
    type Input = ListAlertsInput;

    const NAME: &'static str = "list_alerts";
    const DESCRIPTION: &'static str = "List money-laundering alerts raised by the detection rules, \
        filtered by status, severity, or client.";

    fn parameters() -> Value {
        listing_schema(json!({
            "status": {
                "type": "string",
                "enum": AlertStatus::VALUES,
                "description": "Alert lifecycle status"
            },
            "severity": {
                "type": "string",
                "enum": AlertSeverity::VALUES
            },
            "clientId": {
                "type": "string",
                "description": "Only alerts of this client id"
            }
        }))
    }

    fn request(input: &Self::Input) -> Result<(String, Query), ToolError> {
        let mut query = input.page.query()?;
        if let Some(status) = input.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(severity) = input.severity {
            query.push(("severity", severity.as_str().to_string()));
        }
        if let Some(client_id) = input.client_id.as_deref().filter(|s| !s.is_empty()) {
            query.push(("clientId", client_id.to_string()));
        }
        Ok(("/api/v1/alerts".to_string(), query))
    }

    fn summarize(_input: &Self::Input, body: Value) -> Result<String, ToolError> {
        summarize_listing(body, "alerts", |a: &AlertRecord| {
            format!(
                "[{}] {}: {} (client {}, created {}) [id: {}]",
                text(&a.severity),
                text(&a.status),
                text(&a.description),
                text(&a.client_id),
                text(&a.created_at),
                text(&a.id)
            )
        })
    }
}

// ─────────────────────────────────────────────
// list_reports
// ─────────────────────────────────────────────

pub struct ListReports;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReportsInput {
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReportRecord {
    #[serde(deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    period_start: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    period_end: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    alert_count: Option<u64>,
}

impl DataQuery for ListReports {
    type Input = ListReportsInput;

    const NAME: &'static str = "list_reports";
    const DESCRIPTION: &'static str = "List regulatory reports (notices) with their period and \
        submission status.";

    fn parameters() -> Value {
        listing_schema(json!({
            "status": {
                "type": "string",
                "enum": ReportStatus::VALUES
            }
        }))
    }

    fn request(input: &Self::Input) -> Result<(String, Query), ToolError> {
        let mut query = input.page.query()?;
        if let Some(status) = input.status {
            query.push(("status", status.as_str().to_string()));
        }
        Ok(("/api/v1/reports".to_string(), query))
    }

    fn summarize(_input: &Self::Input, body: Value) -> Result<String, ToolError> {
        summarize_listing(body, "reports", |r: &ReportRecord| {
            format!(
                "{}: {} to {}, {}, {} alerts [id: {}]",
                text(&r.name),
                text(&r.period_start),
                text(&r.period_end),
                text(&r.status),
                r.alert_count.unwrap_or(0),
                text(&r.id)
            )
        })
    }
}

// ─────────────────────────────────────────────
// get_stats
// ─────────────────────────────────────────────

pub struct GetStats;

#[derive(Debug, Deserialize)]
pub struct GetStatsInput {
    pub resource: StatsResource,
}

impl DataQuery for GetStats {
    type Input = GetStatsInput;

    const NAME: &'static str = "get_stats";
    const DESCRIPTION: &'static str = "Get aggregate statistics (totals and breakdowns) for \
        clients, transactions, alerts, or reports.";

    fn parameters() -> Value {
        json!({
            "type": "object",
            "properties": {
                "resource": {
                    "type": "string",
                    "enum": StatsResource::VALUES
                }
            },
            "required": ["resource"]
        })
    }

    fn request(input: &Self::Input) -> Result<(String, Query), ToolError> {
        Ok((format!("/api/v1/{}/stats", input.resource.as_str()), Vec::new()))
    }

    fn summarize(input: &Self::Input, body: Value) -> Result<String, ToolError> {
        let stats = match body.get("data") {
            Some(data @ Value::Object(_)) => data,
            _ => &body,
        };
        let fields = stats
            .as_object()
            .ok_or_else(|| ToolError::Malformed("stats response is not an object".into()))?;

        let mut out = format!("Statistics for {}:", input.resource.as_str());
        for (key, value) in fields {
            match value {
                Value::Object(nested) => {
                    for (sub, v) in nested {
                        out.push_str(&format!("\n- {key}.{sub}: {}", scalar(v)));
                    }
                }
                Value::Array(items) => out.push_str(&format!("\n- {key}: {} entries", items.len())),
                v => out.push_str(&format!("\n- {key}: {}", scalar(v))),
            }
        }
        Ok(out)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> Arc<BackendClient> {
        Arc::new(BackendClient::new(&server.uri(), "jwt-1", Duration::from_secs(5)))
    }

    fn params(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_listing_schema_bounds() {
        let schema = SearchClients::parameters();
        assert_eq!(schema["properties"]["limit"]["maximum"], MAX_PAGE_SIZE);
        assert_eq!(schema["properties"]["limit"]["default"], DEFAULT_PAGE_SIZE);
        assert_eq!(
            schema["properties"]["personType"]["enum"],
            json!(["physical", "moral", "trust"])
        );
    }

    #[test]
    fn test_request_defaults_and_filters() {
        let input: ListAlertsInput =
            parse_input(params(json!({"status": "DETECTED", "severity": "HIGH"}))).unwrap();
        let (path, query) = ListAlerts::request(&input).unwrap();
        assert_eq!(path, "/api/v1/alerts");
        assert!(query.contains(&("limit", "10".to_string())));
        assert!(query.contains(&("page", "1".to_string())));
        assert!(query.contains(&("status", "DETECTED".to_string())));
        assert!(query.contains(&("severity", "HIGH".to_string())));
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let err = parse_input::<ListAlertsInput>(params(json!({"severity": "APOCALYPTIC"})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_page_size_bounds() {
        for limit in [0, MAX_PAGE_SIZE + 1] {
            let input: ListReportsInput = parse_input(params(json!({"limit": limit}))).unwrap();
            assert!(matches!(
                ListReports::request(&input),
                Err(ToolError::InvalidInput(_))
            ));
        }
        let input: ListReportsInput = parse_input(params(json!({"page": 0}))).unwrap();
        assert!(ListReports::request(&input).is_err());
    }

    #[test]
    fn test_stats_path() {
        let input: GetStatsInput = parse_input(params(json!({"resource": "transactions"}))).unwrap();
        let (path, query) = GetStats::request(&input).unwrap();
        assert_eq!(path, "/api/v1/transactions/stats");
        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn test_search_clients_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/clients"))
            .and(header("Authorization", "Bearer jwt-1"))
            .and(query_param("search", "Garcia"))
            .and(query_param("personType", "physical"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": "c-1", "firstName": "Ana", "lastName": "Garcia", "personType": "physical", "rfc": "GAAA900101XX1"},
                    {"id": "c-2", "firstName": "Luis", "lastName": "Garcia", "personType": "physical"}
                ],
                "pagination": {"total": 5, "page": 1, "limit": 2, "totalPages": 3}
            })))
            .mount(&server)
            .await;

        let tool = SearchClientsTool::new(backend(&server));
        let out = tool
            .execute(params(json!({"search": "Garcia", "personType": "physical", "limit": 2})))
            .await;

        assert!(out.starts_with("Found 5 clients (page 1 of 3). Showing 2:"));
        assert!(out.contains("- Ana Garcia (RFC: GAAA900101XX1, physical) [id: c-1]"));
        assert!(out.contains("- Luis Garcia (RFC: -, physical) [id: c-2]"));
        assert!(out.contains("request page 2"));
    }

    #[tokio::test]
    async fn test_list_transactions_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/transactions"))
            .and(query_param("clientId", "c-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": "t-9", "clientId": "c-1", "operationType": "purchase",
                    "amount": "250000.00", "currency": "MXN", "operationDate": "2026-09-30"
                }],
                "pagination": {"total": 1, "page": 1, "limit": 10, "totalPages": 1}
            })))
            .mount(&server)
            .await;

        let out = ListTransactionsTool::new(backend(&server))
            .execute(params(json!({"clientId": "c-1"})))
            .await;
        assert!(out.contains("2026-09-30: purchase of 250000.00 MXN for client c-1 [id: t-9]"));
        assert!(!out.contains("More results"));
    }

    #[tokio::test]
    async fn test_list_alerts_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/alerts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "pagination": {"total": 0, "page": 1, "limit": 10, "totalPages": 0}
            })))
            .mount(&server)
            .await;

        let out = ListAlertsTool::new(backend(&server)).execute(HashMap::new()).await;
        assert_eq!(out, "No alerts found matching those filters.");
    }

    #[tokio::test]
    async fn test_backend_500_resolves_to_error_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let out = ListReportsTool::new(backend(&server)).execute(HashMap::new()).await;
        assert!(out.starts_with("Error:"));
        assert!(out.contains("500"));
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let out = ListAlertsTool::new(backend(&server))
            .execute(params(json!({"limit": 500})))
            .await;
        assert!(out.starts_with("Error: invalid input"));
    }

    #[tokio::test]
    async fn test_malformed_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let out = ListReportsTool::new(backend(&server)).execute(HashMap::new()).await;
        assert!(out.starts_with("Error: unexpected response"));
    }

    #[tokio::test]
    async fn test_numeric_ids_and_null_counts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/clients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 42, "businessName": "Casa Lima SA", "personType": "moral", "rfc": null}],
                "pagination": {"total": 1, "page": 1, "limit": 10, "totalPages": 1}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 7, "name": "Q3 notice", "status": "DRAFT", "alertCount": "4"},
                    {"id": "r-8", "name": "Q4 notice", "alertCount": null}
                ],
                "pagination": {"total": null, "page": null, "limit": 10, "totalPages": 3}
            })))
            .mount(&server)
            .await;

        let clients = SearchClientsTool::new(backend(&server)).execute(HashMap::new()).await;
        assert!(clients.contains("- Casa Lima SA (RFC: -, moral) [id: 42]"));

        let reports = ListReportsTool::new(backend(&server)).execute(HashMap::new()).await;
        assert!(reports.starts_with("Found 2 reports (page 1 of 3). Showing 2:"));
        assert!(reports.contains("- Q3 notice: - to -, DRAFT, 4 alerts [id: 7]"));
        assert!(reports.contains("0 alerts [id: r-8]"));
        assert!(reports.contains("request page 2"));
    }

    #[tokio::test]
    async fn test_get_stats_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/alerts/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "total": 42,
                    "bySeverity": {"HIGH": 5, "LOW": 37},
                    "recent": [1, 2, 3]
                }
            })))
            .mount(&server)
            .await;

        let out = GetStatsTool::new(backend(&server))
            .execute(params(json!({"resource": "alerts"})))
            .await;
        assert!(out.starts_with("Statistics for alerts:"));
        assert!(out.contains("- total: 42"));
        assert!(out.contains("- bySeverity.HIGH: 5"));
        assert!(out.contains("- recent: 3 entries"));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let backend = Arc::new(BackendClient::new(
            "http://127.0.0.1:1",
            "jwt",
            Duration::from_secs(2),
        ));
        let out = GetStatsTool::new(backend)
            .execute(params(json!({"resource": "clients"})))
            .await;
        assert!(out.starts_with("Error: request failed"));
    }
}
