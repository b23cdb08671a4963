//! API Handlers
//!
//! HTTP request handlers for each viewer endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::config::Config;
use crate::coordinator::CacheCoordinator;
use crate::error::{Result, ViewerError};
use crate::models::{
    CloseResponse, DocumentRequest, DocumentResponse, HealthResponse, PageQuery,
    SheetDataResponse, StatsResponse,
};
use crate::source::{FileAccess, WorkbookParser};

/// Application state shared across all handlers.
///
/// The coordinator does its own locking, so it is shared as-is.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: CacheCoordinator,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(coordinator: CacheCoordinator, config: Config) -> Self {
        Self {
            coordinator,
            config: Arc::new(config),
        }
    }

    /// Creates a coordinator sized from the configuration.
    pub fn from_config(
        config: Config,
        files: Arc<dyn FileAccess>,
        parser: Arc<dyn WorkbookParser>,
    ) -> Self {
        let coordinator = CacheCoordinator::from_config(&config, files, parser);
        Self::new(coordinator, config)
    }
}

/// Handler for POST /documents/open
pub async fn open_handler(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ViewerError::InvalidRequest(error_msg));
    }

    let workbook = state.coordinator.open_document(&req.identity).await?;
    Ok(Json(DocumentResponse::new(
        req.identity,
        workbook.sheet_names.clone(),
    )))
}

/// Handler for POST /documents/page
pub async fn page_handler(
    State(state): State<AppState>,
    Json(req): Json<PageQuery>,
) -> Result<Json<SheetDataResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ViewerError::InvalidRequest(error_msg));
    }

    let request = req.to_page_request(&state.config);
    let page = state.coordinator.get_page(&req.identity, &request).await?;
    Ok(Json(SheetDataResponse {
        identity: req.identity,
        page,
    }))
}

/// Handler for POST /documents/invalidate
///
/// Treated as a change notification: drops everything cached for the
/// document and reloads it.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ViewerError::InvalidRequest(error_msg));
    }

    let workbook = state
        .coordinator
        .handle_change(&req.identity)
        .await?
        .ok_or_else(|| ViewerError::DocumentNotOpen(req.identity.clone()))?;
    Ok(Json(DocumentResponse::new(
        req.identity,
        workbook.sheet_names.clone(),
    )))
}

/// Handler for POST /documents/close
pub async fn close_handler(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<CloseResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ViewerError::InvalidRequest(error_msg));
    }

    if !state.coordinator.close_document(&req.identity).await {
        return Err(ViewerError::DocumentNotOpen(req.identity));
    }
    Ok(Json(CloseResponse::new(req.identity)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.coordinator.stats().await;
    Json(StatsResponse::from(&stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FormatParser, FsFileAccess};
    use std::path::PathBuf;
    use std::time::Duration;

    fn test_state() -> AppState {
        AppState::from_config(
            Config::default(),
            Arc::new(FsFileAccess::new(Duration::from_millis(50))),
            Arc::new(FormatParser),
        )
    }

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sheet_pager_handlers_{}_{}.csv",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_open_and_page_handler() {
        let state = test_state();
        let path = temp_csv("open", "a,b\n1,2\n3,4\n");
        let identity = path.to_string_lossy().to_string();

        let opened = open_handler(
            State(state.clone()),
            Json(DocumentRequest {
                identity: identity.clone(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(opened.sheet_names, vec!["Sheet1"]);

        let query = PageQuery {
            identity: identity.clone(),
            sheet_name: "Sheet1".to_string(),
            page: 0,
            rows_per_page: Some(2),
            max_columns: None,
        };
        let page = page_handler(State(state.clone()), Json(query)).await.unwrap();
        assert_eq!(page.page.page_count, 2);

        let closed = close_handler(State(state), Json(DocumentRequest { identity })).await;
        assert!(closed.is_ok());
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_page_for_unopened_document() {
        let state = test_state();
        let query = PageQuery {
            identity: "/nowhere/x.csv".to_string(),
            sheet_name: "Sheet1".to_string(),
            page: 0,
            rows_per_page: None,
            max_columns: None,
        };

        let result = page_handler(State(state), Json(query)).await;
        assert!(matches!(result, Err(ViewerError::DocumentNotOpen(_))));
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let state = test_state();

        let result = open_handler(
            State(state.clone()),
            Json(DocumentRequest {
                identity: String::new(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ViewerError::InvalidRequest(_))));

        let result = close_handler(
            State(state),
            Json(DocumentRequest {
                identity: "/never/opened.csv".to_string(),
            }),
        )
        .await;
        assert!(matches!(result, Err(ViewerError::DocumentNotOpen(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.pages.hits, 0);
        assert_eq!(response.workbooks.capacity, 10);
        assert_eq!(response.open_documents, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
