//! Local item cache and transient UI state.
//!
//! [`SyncState`] is the only holder of the displayed item list, the busy
//! flag, the two notice channels and the create-form draft. It changes only
//! through the `begin`/`finish_*` pairs below, which encode the
//! reconciliation rules:
//!
//! - a successful load replaces the list wholesale
//! - a successful create prepends the returned item
//! - a successful archive removes the item by id
//! - any failure leaves the list untouched
//!
//! Each finished action sets exactly one notice channel.

use std::time::{Duration, Instant};

use notiondeck_proto::item::{CreateItemRequest, Item, ItemStatus};

use super::notice::{DEFAULT_NOTICE_TTL, NoticeKind, NoticeSlot};
use crate::api::{ApiClientError, Health, ItemListing};

/// Success notice after adding an item.
pub const ADDED_MESSAGE: &str = "Item added to Notion successfully!";

/// Success notice after archiving an item.
pub const ARCHIVED_MESSAGE: &str = "Item archived in Notion";

/// Success notice after a health probe.
pub const PROBE_OK_MESSAGE: &str = "Backend connection successful!";

/// Values of the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Title as typed.
    pub title: String,
    /// Description as typed.
    pub description: String,
    /// Selected status.
    pub status: ItemStatus,
}

impl Draft {
    /// Builds the request to send, trimming the text fields.
    #[must_use]
    pub fn to_request(&self) -> CreateItemRequest {
        CreateItemRequest::new(self.title.trim(), self.description.trim(), &self.status)
    }
}

/// State owned by the sync controller.
#[derive(Debug, Clone)]
pub struct SyncState {
    items: Vec<Item>,
    busy: bool,
    error: NoticeSlot,
    success: NoticeSlot,
    /// Create-form draft.
    pub draft: Draft,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl SyncState {
    /// Creates an empty state whose notices live for `notice_ttl`.
    #[must_use]
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            busy: false,
            error: NoticeSlot::new(notice_ttl),
            success: NoticeSlot::new(notice_ttl),
            draft: Draft::default(),
        }
    }

    /// Cached items, newest first.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether a user-triggered request is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// The notice on `kind`'s channel, if still visible at `now`.
    #[must_use]
    pub fn notice(&self, kind: NoticeKind, now: Instant) -> Option<&str> {
        match kind {
            NoticeKind::Success => self.success.visible(now),
            NoticeKind::Error => self.error.visible(now),
        }
    }

    /// Drops notices whose window elapsed. Returns `true` if any changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let error = self.error.expire(now);
        let success = self.success.expire(now);
        error || success
    }

    /// Marks a request as started and clears the error channel.
    pub fn begin(&mut self) {
        self.busy = true;
        self.error.clear();
    }

    /// Reports a local validation failure without touching the list.
    pub fn reject(&mut self, err: &ApiClientError, now: Instant) {
        self.error.set(err.to_string(), now);
    }

    /// Applies the outcome of a list call.
    pub fn finish_load(&mut self, result: Result<ItemListing, ApiClientError>, now: Instant) {
        self.busy = false;
        match result {
            Ok(listing) => {
                self.items = listing.items;
                self.success
                    .set(format!("Loaded {} items from Notion", listing.count), now);
            }
            Err(e) => self.error.set(format!("Failed to fetch items: {e}"), now),
        }
    }

    /// Applies the outcome of a create call.
    pub fn finish_create(&mut self, result: Result<Item, ApiClientError>, now: Instant) {
        self.busy = false;
        match result {
            Ok(item) => {
                self.items.insert(0, item);
                self.draft = Draft::default();
                self.success.set(ADDED_MESSAGE, now);
            }
            Err(e) => self.error.set(format!("Failed to add item: {e}"), now),
        }
    }

    /// Applies the outcome of an archive call for `id`.
    pub fn finish_archive(
        &mut self,
        id: &str,
        result: Result<String, ApiClientError>,
        now: Instant,
    ) {
        self.busy = false;
        match result {
            Ok(_) => {
                self.items.retain(|item| item.id != id);
                self.success.set(ARCHIVED_MESSAGE, now);
            }
            Err(e) => self.error.set(format!("Failed to archive item: {e}"), now),
        }
    }

    /// Applies the outcome of a health probe.
    ///
    /// Probes do not use the busy flag and never change the list.
    pub fn finish_probe(
        &mut self,
        location: &str,
        result: &Result<Health, ApiClientError>,
        now: Instant,
    ) {
        match result {
            Ok(_) => self.success.set(PROBE_OK_MESSAGE, now),
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                self.error.set(
                    format!("Backend not responding. Make sure it's running at {location}"),
                    now,
                );
            }
        }
    }
}
