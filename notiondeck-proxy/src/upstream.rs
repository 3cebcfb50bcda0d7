//! Minimal Notion REST client.
//!
//! Covers the three calls the proxy needs: query a database newest-first,
//! create a page in it, and archive a page. Raw page records are returned
//! as [`Page`]; turning them into items is the job of [`crate::adapter`].

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Production Notion API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Protocol version sent in the `Notion-Version` header.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Errors from calls to the Notion API.
///
/// Every variant is surfaced identically to proxy clients; only the message
/// differs.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Notion answered with a non-success status.
    #[error("Notion API error: {}", status_line(.status))]
    Status {
        /// Status code returned by Notion.
        status: StatusCode,
    },
    /// The request could not be sent or the body could not be decoded.
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    /// The configured base URL or a derived endpoint is not a valid URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn status_line(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Page schema (only the parts the proxy reads)
// ---------------------------------------------------------------------------

/// A Notion page as returned by query and create calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page identifier.
    pub id: String,
    /// Creation time assigned by Notion.
    pub created_time: DateTime<Utc>,
    /// Canonical link to the page.
    pub url: Url,
    /// Typed property containers.
    #[serde(default)]
    pub properties: PageProperties,
}

/// The properties of a page the proxy knows about.
///
/// Absent properties, or properties of an unexpected type, decode as empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageProperties {
    /// Title property.
    #[serde(rename = "Name", default)]
    pub name: TitleProperty,
    /// Rich-text description property.
    #[serde(rename = "Description", default)]
    pub description: RichTextProperty,
    /// Single-select status property.
    #[serde(rename = "Status", default)]
    pub status: SelectProperty,
}

/// A title-type property container.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TitleProperty {
    /// Text runs.
    #[serde(default)]
    pub title: Vec<RichText>,
}

/// A rich-text-type property container.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RichTextProperty {
    /// Text runs.
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

/// A single-select property container.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SelectProperty {
    /// Selected option, `null` when unset.
    #[serde(default)]
    pub select: Option<SelectOption>,
}

/// An option of a select property.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectOption {
    /// Option label.
    pub name: String,
}

/// A text run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RichText {
    /// Unformatted text of the run.
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Page>,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct QueryRequest {
    sorts: [Sort; 1],
}

#[derive(Serialize)]
struct Sort {
    timestamp: &'static str,
    direction: &'static str,
}

#[derive(Serialize)]
struct CreatePageRequest<'a> {
    parent: Parent<'a>,
    properties: NewPageProperties<'a>,
}

#[derive(Serialize)]
struct Parent<'a> {
    database_id: &'a str,
}

#[derive(Serialize)]
struct NewPageProperties<'a> {
    #[serde(rename = "Name")]
    name: NewTitle<'a>,
    #[serde(rename = "Description")]
    description: NewRichText<'a>,
}

#[derive(Serialize)]
struct NewTitle<'a> {
    title: [TextRun<'a>; 1],
}

#[derive(Serialize)]
struct NewRichText<'a> {
    rich_text: [TextRun<'a>; 1],
}

#[derive(Serialize)]
struct TextRun<'a> {
    text: TextContent<'a>,
}

#[derive(Serialize)]
struct TextContent<'a> {
    content: &'a str,
}

impl<'a> TextRun<'a> {
    const fn new(content: &'a str) -> Self {
        Self {
            text: TextContent { content },
        }
    }
}

#[derive(Serialize)]
struct ArchiveRequest {
    archived: bool,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client bound to one Notion database and one integration token.
#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    base_url: Url,
    token: String,
    version: String,
    database_id: String,
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url.as_str())
            .field("version", &self.version)
            .field("database_id", &self.database_id)
            .finish_non_exhaustive()
    }
}

impl NotionClient {
    /// Creates a client against the production API.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in base URL; the `Result` mirrors
    /// [`NotionClient::with_base_url`].
    pub fn new(
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        Self::with_base_url(DEFAULT_BASE_URL, token, database_id)
    }

    /// Creates a client against a custom base URL (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Url`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
            token: token.into(),
            version: DEFAULT_NOTION_VERSION.to_string(),
            database_id: database_id.into(),
        })
    }

    /// Overrides the `Notion-Version` header value.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The database this client reads and writes.
    #[must_use]
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// Lists the pages of the database, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport failure or a non-success status.
    pub async fn query_database(&self) -> Result<Vec<Page>, UpstreamError> {
        let url = self.endpoint(&["v1", "databases", &self.database_id, "query"])?;
        let body = QueryRequest {
            sorts: [Sort {
                timestamp: "created_time",
                direction: "descending",
            }],
        };
        let response = self.authorized(self.http.post(url)).json(&body).send().await?;
        let payload: QueryResponse = Self::handle_response(response).await?;
        Ok(payload.results)
    }

    /// Creates a page holding `title` and `description`.
    ///
    /// The status property is left unset.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport failure or a non-success status.
    pub async fn create_page(&self, title: &str, description: &str) -> Result<Page, UpstreamError> {
        let url = self.endpoint(&["v1", "pages"])?;
        let body = CreatePageRequest {
            parent: Parent {
                database_id: &self.database_id,
            },
            properties: NewPageProperties {
                name: NewTitle {
                    title: [TextRun::new(title)],
                },
                description: NewRichText {
                    rich_text: [TextRun::new(description)],
                },
            },
        };
        let response = self.authorized(self.http.post(url)).json(&body).send().await?;
        Self::handle_response(response).await
    }

    /// Sets the archived flag on a page.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on transport failure or a non-success
    /// status, including 404 for unknown ids.
    pub async fn archive_page(&self, page_id: &str) -> Result<(), UpstreamError> {
        let url = self.endpoint(&["v1", "pages", page_id])?;
        let response = self
            .authorized(self.http.patch(url))
            .json(&ArchiveRequest { archived: true })
            .send()
            .await?;
        let _: serde::de::IgnoredAny = Self::handle_response(response).await?;
        Ok(())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
    }

    /// Builds an endpoint URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "notion call failed");
            Err(UpstreamError::Status { status })
        }
    }
}
