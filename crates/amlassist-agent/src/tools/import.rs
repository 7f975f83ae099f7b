//! The file-import action tool.
//!
//! The file is attached before the tool is registered; the model only decides
//! whether to run the import by passing `confirm: true`. A confirmed call makes
//! exactly one upload.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::backend::BackendClient;
use super::base::{lenient_count, lenient_text, parse_input, string_or_number, Tool, ToolError};

const IMPORTS_PATH: &str = "/api/v1/imports";

/// What the uploaded rows describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportEntityType {
    Client,
    Transaction,
}

impl ImportEntityType {
    /// Value of the `entityType` form field.
    pub fn as_wire(self) -> &'static str {
        match self {
            ImportEntityType::Client => "CLIENT",
            ImportEntityType::Transaction => "TRANSACTION",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ImportEntityType::Client => "client",
            ImportEntityType::Transaction => "transaction",
        }
    }

    /// Dashboard path listing the imported entities.
    fn list_path(self) -> &'static str {
        match self {
            ImportEntityType::Client => "/clients",
            ImportEntityType::Transaction => "/transactions",
        }
    }
}

impl std::str::FromStr for ImportEntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" | "clients" => Ok(ImportEntityType::Client),
            "transaction" | "transactions" => Ok(ImportEntityType::Transaction),
            other => Err(format!("unknown entity type '{other}' (expected client or transaction)")),
        }
    }
}

/// A file attached to the request, waiting for the model to confirm it.
#[derive(Clone, Debug)]
pub struct PendingImport {
    pub file_name: String,
    pub entity_type: ImportEntityType,
    /// Base64 content, optionally as a `data:` URL.
    pub content: String,
}

impl PendingImport {
    pub fn new(
        file_name: impl Into<String>,
        entity_type: ImportEntityType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            entity_type,
            content: content.into(),
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, entity_type: ImportEntityType, bytes: &[u8]) -> Self {
        Self::new(file_name, entity_type, STANDARD.encode(bytes))
    }

    fn decode(&self) -> Result<Vec<u8>, ToolError> {
        let payload = match self.content.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => self.content.as_str(),
        };
        STANDARD
            .decode(payload.trim())
            .map_err(|e| ToolError::InvalidInput(format!("attached file is not valid base64: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct ImportInput {
    confirm: bool,
}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ImportRecord>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRecord {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    total_rows: Option<u64>,
    #[serde(default, deserialize_with = "lenient_text")]
    file_name: Option<String>,
}

// ─────────────────────────────────────────────
// ImportFileTool
// ─────────────────────────────────────────────

pub struct ImportFileTool {
    backend: Arc<BackendClient>,
    app_url: String,
    file: PendingImport,
}

impl ImportFileTool {
    pub fn new(backend: Arc<BackendClient>, app_url: &str, file: PendingImport) -> Self {
        Self {
            backend,
            app_url: app_url.trim_end_matches('/').to_string(),
            file,
        }
    }

    async fn upload(&self) -> Result<ImportRecord, ToolError> {
        let bytes = self.file.decode()?;
        let mime = mime_guess::from_path(&self.file.file_name).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(self.file.file_name.clone())
            .mime_str(mime.as_ref())?;
        let form = Form::new()
            .part("file", part)
            .text("entityType", self.file.entity_type.as_wire());

        let body = self.backend.post_multipart(IMPORTS_PATH, form).await?;
        let response: ImportResponse =
            serde_json::from_value(body).map_err(|e| ToolError::Malformed(e.to_string()))?;

        match response {
            ImportResponse {
                success: true,
                data: Some(record),
                ..
            } => Ok(record),
            ImportResponse { error, .. } => Err(ToolError::Rejected(
                error.unwrap_or_else(|| "import was not created".to_string()),
            )),
        }
    }

    fn render_success(&self, record: &ImportRecord) -> String {
        let entity = self.file.entity_type;
        let file_name = record.file_name.as_deref().unwrap_or(&self.file.file_name);
        let rows = record
            .total_rows
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        format!(
            "Import started for {file_name}.\n\
             - Import ID: {}\n\
             - Entity type: {}\n\
             - Rows: {rows}\n\
             - Status: {}\n\
             Track progress: {}/import/{}\n\
             View {}s: {}{}",
            record.id,
            entity.as_wire(),
            record.status.as_deref().unwrap_or("PENDING"),
            self.app_url,
            record.id,
            entity.slug(),
            self.app_url,
            entity.list_path(),
        )
    }

    fn template_url(&self) -> String {
        format!("{}/import/templates/{}", self.app_url, self.file.entity_type.slug())
    }
}

#[async_trait]
impl Tool for ImportFileTool {
    fn name(&self) -> &str {
        "import_file"
    }

    fn description(&self) -> &str {
        "Import the file the user attached to this conversation into the backend. \
         Only call this after the user has explicitly confirmed the import, and pass \
         confirm=true. Each confirmed call creates a new import."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "confirm": {
                    "type": "boolean",
                    "description": "true only when the user has confirmed the import"
                }
            },
            "required": ["confirm"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> String {
        let input: ImportInput = match parse_input(params) {
            Ok(input) => input,
            Err(e) => return e.render(),
        };

        if !input.confirm {
            return format!(
                "Import of {} was not started: the user has not confirmed it. \
                 Ask the user to confirm before importing.",
                self.file.file_name
            );
        }

        match self.upload().await {
            Ok(record) => {
                info!(import_id = %record.id, file = %self.file.file_name, "import created");
                self.render_success(&record)
            }
            Err(e) => {
                warn!(file = %self.file.file_name, error = %e, "import failed");
                format!(
                    "{}\nCheck the file against the import template: {}",
                    e.render(),
                    self.template_url()
                )
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
