//! Client side of the proxy's REST surface.
//!
//! Defines the [`ItemsApi`] trait the sync controller drives, and
//! [`HttpItemsApi`], its reqwest-backed implementation. Responses are
//! decoded as [`ApiResponse`] envelopes whatever the HTTP status, so the
//! proxy's `error` text reaches the user verbatim.

use chrono::{DateTime, Utc};
use notiondeck_proto::envelope::{Ack, ApiResponse};
use notiondeck_proto::item::{CreateItemRequest, Item, ItemError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

/// Default location of the proxy's `/api` prefix.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Errors surfaced by [`ItemsApi`] calls and local validation.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The request was rejected locally and never sent.
    #[error(transparent)]
    Validation(#[from] ItemError),
    /// The proxy answered with `success: false`.
    #[error("{0}")]
    Server(String),
    /// The proxy could not be reached or answered with something other
    /// than an envelope.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The configured base URL is not usable.
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
}

/// A list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListing {
    /// Items in server order.
    pub items: Vec<Item>,
    /// Count reported by the server.
    pub count: usize,
}

/// A health probe response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    /// Liveness message.
    pub message: String,
    /// Server time, if reported.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Async access to the item proxy.
///
/// Implementations issue exactly one request per call and never retry.
pub trait ItemsApi: Send + Sync {
    /// Fetches every item, newest first.
    fn list(&self) -> impl std::future::Future<Output = Result<ItemListing, ApiClientError>> + Send;

    /// Creates an item and returns it as the server echoed it.
    fn create(
        &self,
        request: &CreateItemRequest,
    ) -> impl std::future::Future<Output = Result<Item, ApiClientError>> + Send;

    /// Archives an item, returning the server's acknowledgment.
    fn archive(&self, id: &str) -> impl std::future::Future<Output = Result<String, ApiClientError>> + Send;

    /// Probes the proxy's liveness endpoint.
    fn health(&self) -> impl std::future::Future<Output = Result<Health, ApiClientError>> + Send;

    /// Human-readable location of the proxy, for messages.
    fn location(&self) -> String;
}

/// [`ItemsApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpItemsApi {
    http: Client,
    base_url: Url,
}

impl HttpItemsApi {
    /// Creates a client for the proxy at `base_url` (the `/api` prefix).
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Url`] if `base_url` does not parse or
    /// cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<ApiResponse<T>, ApiClientError> {
        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_result(fallback).map_err(|e| {
            tracing::debug!(status = %status, error = %e, "proxy reported failure");
            ApiClientError::Server(e)
        })
    }
}

impl ItemsApi for HttpItemsApi {
    async fn list(&self) -> Result<ItemListing, ApiClientError> {
        let response = self.http.get(self.endpoint(&["items"])).send().await?;
        let envelope = Self::decode::<Vec<Item>>(response, "Failed to fetch items").await?;
        let items = envelope.data.unwrap_or_default();
        Ok(ItemListing {
            count: envelope.count.unwrap_or(items.len()),
            items,
        })
    }

    async fn create(&self, request: &CreateItemRequest) -> Result<Item, ApiClientError> {
        let response = self
            .http
            .post(self.endpoint(&["items"]))
            .json(request)
            .send()
            .await?;
        let envelope = Self::decode::<Item>(response, "Failed to add item").await?;
        envelope
            .data
            .ok_or_else(|| ApiClientError::Server("Failed to add item".to_string()))
    }

    async fn archive(&self, id: &str) -> Result<String, ApiClientError> {
        let response = self
            .http
            .delete(self.endpoint(&["items", id]))
            .send()
            .await?;
        let envelope: Ack = Self::decode(response, "Failed to archive item").await?;
        Ok(envelope.message.unwrap_or_default())
    }

    async fn health(&self) -> Result<Health, ApiClientError> {
        let response = self.http.get(self.endpoint(&["health"])).send().await?;
        let envelope: Ack = Self::decode(response, "Backend health check failed").await?;
        Ok(Health {
            message: envelope.message.unwrap_or_default(),
            timestamp: envelope.timestamp,
        })
    }

    fn location(&self) -> String {
        self.base_url.to_string()
    }
}
