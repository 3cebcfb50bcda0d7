//! HTTP surface of the proxy: routes, handlers, and error normalization.
//!
//! Every `/api` route answers with an [`ApiResponse`] envelope. Failures
//! are flattened into two buckets: validation failures (400) and everything
//! that went wrong upstream (500). No route retries.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use notiondeck_proto::envelope::{Ack, ApiResponse};
use notiondeck_proto::item::{CreateItemRequest, Item};

use crate::adapter::{AdapterError, ItemAdapter};

/// Plain-text body of `GET /`.
pub const ROOT_MESSAGE: &str = "Notion Backend is running. Use /api/* routes for data.";

/// Message returned by the health probe.
pub const HEALTH_MESSAGE: &str = "Notion Backend Proxy is running!";

/// Message returned after a successful archive.
pub const ARCHIVED_MESSAGE: &str = "Item archived successfully";

/// Shared proxy state handed to every handler.
#[derive(Debug, Clone)]
pub struct ProxyState {
    /// Item operations against the configured database.
    pub adapter: ItemAdapter,
}

impl ProxyState {
    /// Creates proxy state around an adapter.
    #[must_use]
    pub const fn new(adapter: ItemAdapter) -> Self {
        Self { adapter }
    }
}

/// A failure returned to proxy clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),
    /// Anything that went wrong while talking to Notion.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    /// HTTP status the error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdapterError> for ApiError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Invalid(e) => Self::BadRequest(e.to_string()),
            AdapterError::Upstream(e) => Self::Upstream(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body: Ack = ApiResponse::failure(self.to_string());
        (status, Json(body)).into_response()
    }
}

/// Builds the proxy router.
pub fn router(state: Arc<ProxyState>) -> axum::Router {
    axum::Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/{id}", delete(archive_item))
        .with_state(state)
}

/// Start the proxy server on the given address with the given state.
///
/// Returns the bound address and a join handle for the server task. Binding
/// to port 0 picks a free port.
///
/// # Errors
///
/// Returns an error if the listener cannot bind.
pub async fn start_server(
    addr: &str,
    state: Arc<ProxyState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "proxy server error");
        }
    });

    Ok((bound_addr, handle))
}

async fn root() -> &'static str {
    ROOT_MESSAGE
}

async fn health() -> Json<Ack> {
    Json(ApiResponse::acknowledged(HEALTH_MESSAGE).with_timestamp(chrono::Utc::now()))
}

async fn list_items(
    State(state): State<Arc<ProxyState>>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ApiError> {
    tracing::info!("fetching items from notion");
    match state.adapter.list_items().await {
        Ok(list) => {
            tracing::info!(count = list.count, "fetched items");
            Ok(Json(ApiResponse::list(list.items)))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch items");
            Err(e.into())
        }
    }
}

async fn create_item(
    State(state): State<Arc<ProxyState>>,
    body: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let Json(request) = body.inspect_err(|e| {
        tracing::warn!(error = %e.body_text(), "rejected malformed create body");
    })?;
    tracing::info!(title = ?request.title, "adding new item");
    match state.adapter.create_item(&request).await {
        Ok(item) => {
            tracing::info!(id = %item.id, "added item");
            Ok(Json(ApiResponse::ok(item)))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to add item");
            Err(e.into())
        }
    }
}

async fn archive_item(
    State(state): State<Arc<ProxyState>>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    tracing::info!(id = %id, "archiving item");
    match state.adapter.archive_item(&id).await {
        Ok(()) => {
            tracing::info!(id = %id, "archived item");
            Ok(Json(ApiResponse::acknowledged(ARCHIVED_MESSAGE)))
        }
        Err(e) => {
            tracing::error!(id = %id, error = %e, "failed to archive item");
            Err(e.into())
        }
    }
}
