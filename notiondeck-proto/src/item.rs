//! Item resource types for `NotionDeck`.
//!
//! An [`Item`] is the simplified shape the proxy exposes in place of a raw
//! Notion page. Items are created through [`CreateItemRequest`], which must
//! pass [`CreateItemRequest::validate`] on both sides of the wire before the
//! upstream store is touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Label used for items whose status is absent upstream.
pub const NOT_STARTED: &str = "Not Started";

/// Label for items that are being worked on.
pub const IN_PROGRESS: &str = "In Progress";

/// Label for finished items.
pub const COMPLETED: &str = "Completed";

/// Errors raised while validating a create request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    /// The title is empty or whitespace-only after trimming.
    #[error("Title is required")]
    TitleRequired,
}

/// Status of an item.
///
/// Stored upstream as a free-form select label. The three well-known labels
/// get their own variants; anything else is carried verbatim in
/// [`ItemStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    /// Work has not begun.
    #[default]
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Completed,
    /// Any other label defined in the upstream select field.
    Other(String),
}

impl ItemStatus {
    /// Statuses offered by the create form, in cycling order.
    pub const KNOWN: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    /// Returns the upstream label for this status.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::NotStarted => NOT_STARTED,
            Self::InProgress => IN_PROGRESS,
            Self::Completed => COMPLETED,
            Self::Other(label) => label,
        }
    }

    /// Parses an upstream label, treating an absent or blank one as
    /// [`ItemStatus::NotStarted`].
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("" | NOT_STARTED) => Self::NotStarted,
            Some(IN_PROGRESS) => Self::InProgress,
            Some(COMPLETED) => Self::Completed,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Maps a label without trimming or defaulting, so it echoes exactly as
    /// sent. Only exact matches of a known label get their variant.
    fn verbatim(label: &str) -> Self {
        match label {
            NOT_STARTED => Self::NotStarted,
            IN_PROGRESS => Self::InProgress,
            COMPLETED => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the next well-known status, wrapping around.
    ///
    /// [`ItemStatus::Other`] moves to [`ItemStatus::NotStarted`].
    #[must_use]
    pub fn next(&self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed | Self::Other(_) => Self::NotStarted,
        }
    }
}

impl From<String> for ItemStatus {
    fn from(label: String) -> Self {
        Self::from_label(Some(&label))
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A record of the upstream collection, in client-facing form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier issued by the upstream store.
    pub id: String,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Trimmed description, possibly empty.
    pub description: String,
    /// Current status label.
    pub status: ItemStatus,
    /// Creation time assigned by the upstream store.
    pub created: DateTime<Utc>,
    /// Canonical link to the upstream record.
    pub url: Url,
}

/// Body of `POST /api/items`.
///
/// Every field is optional on the wire so that a missing title is reported
/// as a validation failure rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    /// Title of the new item.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional status label; defaults to "Not Started".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Trimmed description, empty when none was given.
    pub description: String,
    /// Requested status, echoed back to the caller.
    pub status: ItemStatus,
}

impl CreateItemRequest {
    /// Builds a request from form fields.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, status: &ItemStatus) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            status: Some(status.label().to_string()),
        }
    }

    /// Trims the text fields and applies defaults.
    ///
    /// The status defaults to "Not Started" only when absent; a given label
    /// is kept as sent.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::TitleRequired`] if the title is missing, empty,
    /// or whitespace-only.
    pub fn validate(&self) -> Result<NewItem, ItemError> {
        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err(ItemError::TitleRequired);
        }
        Ok(NewItem {
            title: title.to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            status: self
                .status
                .as_deref()
                .map_or(ItemStatus::NotStarted, ItemStatus::verbatim),
        })
    }
}
