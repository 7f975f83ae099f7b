//! Tools the model can call during a turn.

pub mod backend;
pub mod base;
pub mod data;
pub mod import;
pub mod registry;

use std::sync::Arc;

pub use backend::BackendClient;
pub use base::{parse_input, Tool, ToolError, ERROR_MARKER};
pub use data::{
    DataQuery, DataTool, GetStatsTool, ListAlertsTool, ListReportsTool, ListTransactionsTool,
    SearchClientsTool,
};
pub use import::{ImportEntityType, ImportFileTool, PendingImport};
pub use registry::ToolRegistry;

/// Build the registry for one request.
///
/// Every tool shares `backend`, and with it the caller's credential, so a
/// registry must never outlive or cross requests. `import_file` is only
/// offered when a file is attached.
pub fn build_tool_registry(
    backend: Arc<BackendClient>,
    app_url: &str,
    pending_import: Option<PendingImport>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchClientsTool::new(backend.clone())));
    registry.register(Arc::new(ListTransactionsTool::new(backend.clone())));
    registry.register(Arc::new(ListAlertsTool::new(backend.clone())));
    registry.register(Arc::new(ListReportsTool::new(backend.clone())));
    registry.register(Arc::new(GetStatsTool::new(backend.clone())));

    if let Some(file) = pending_import {
        registry.register(Arc::new(ImportFileTool::new(backend, app_url, file)));
    }
    registry
}
