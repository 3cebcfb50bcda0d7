//! Translation between Notion pages and client-facing items.
//!
//! [`ItemAdapter`] wraps a [`NotionClient`] and exposes the three item
//! operations. Field remapping lives in free functions so it can be checked
//! without a network.

use notiondeck_proto::item::{CreateItemRequest, Item, ItemError, ItemStatus};

use crate::upstream::{NotionClient, Page, RichText, UpstreamError};

/// Title used when a page has no title text.
pub const UNTITLED: &str = "Untitled";

/// Description used when a page has no description text.
pub const NO_DESCRIPTION: &str = "No description";

/// Errors surfaced by adapter operations.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The request was rejected before reaching Notion.
    #[error(transparent)]
    Invalid(#[from] ItemError),
    /// Notion could not be reached or rejected the call.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Result of listing the collection.
#[derive(Debug, Clone)]
pub struct ItemList {
    /// Items in upstream order (newest first).
    pub items: Vec<Item>,
    /// Number of items.
    pub count: usize,
}

/// Item operations over a single Notion database.
#[derive(Debug, Clone)]
pub struct ItemAdapter {
    client: NotionClient,
}

impl ItemAdapter {
    /// Creates an adapter over `client`.
    #[must_use]
    pub const fn new(client: NotionClient) -> Self {
        Self { client }
    }

    /// The underlying Notion client.
    #[must_use]
    pub const fn client(&self) -> &NotionClient {
        &self.client
    }

    /// Lists all items, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Upstream`] if the query fails.
    pub async fn list_items(&self) -> Result<ItemList, AdapterError> {
        let pages = self.client.query_database().await?;
        let items: Vec<Item> = pages.into_iter().map(item_from_page).collect();
        Ok(ItemList {
            count: items.len(),
            items,
        })
    }

    /// Creates an item from a client request.
    ///
    /// The requested status is echoed back but never written to Notion.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Invalid`] for a blank title, without calling
    /// Notion, or [`AdapterError::Upstream`] if the create call fails.
    pub async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, AdapterError> {
        let new_item = request.validate()?;
        let page = self
            .client
            .create_page(&new_item.title, &new_item.description)
            .await?;
        Ok(Item {
            id: page.id,
            title: new_item.title,
            description: new_item.description,
            status: new_item.status,
            created: page.created_time,
            url: page.url,
        })
    }

    /// Archives the item with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Upstream`] if Notion rejects the update,
    /// including when the id is unknown.
    pub async fn archive_item(&self, id: &str) -> Result<(), AdapterError> {
        self.client.archive_page(id).await?;
        Ok(())
    }
}

/// Converts a raw page into an item, applying the read-side fallbacks.
#[must_use]
pub fn item_from_page(page: Page) -> Item {
    let props = page.properties;
    Item {
        id: page.id,
        title: first_run(&props.name.title).unwrap_or(UNTITLED).to_string(),
        description: first_run(&props.description.rich_text)
            .unwrap_or(NO_DESCRIPTION)
            .to_string(),
        status: ItemStatus::from_label(props.status.select.as_ref().map(|s| s.name.as_str())),
        created: page.created_time,
        url: page.url,
    }
}

/// Plain text of the first run, if it is non-empty.
fn first_run(runs: &[RichText]) -> Option<&str> {
    runs.first()
        .map(|run| run.plain_text.as_str())
        .filter(|text| !text.is_empty())
}
