//! The single driver of a [`SyncState`].
//!
//! Every action is split in two halves around the network: a request half
//! that checks the busy gate, validates and calls `begin`, handing back the
//! [`NetCommand`] to run, and [`SyncController::apply`], which feeds the
//! matching [`NetEvent`] into the `finish_*` transitions. The net task runs
//! the command in between. Health probes skip the request half entirely.

use std::time::{Duration, Instant};

use notiondeck_proto::item::CreateItemRequest;

use super::notice::{DEFAULT_NOTICE_TTL, NoticeKind};
use super::state::{Draft, SyncState};
use crate::api::ApiClientError;
use crate::net::{NetCommand, NetEvent};

/// Owns the item cache and decides which requests may start.
///
/// Requests are never retried. Failures are recorded on the state's error
/// channel and the cached list is left as it was.
#[derive(Debug, Clone)]
pub struct SyncController {
    state: SyncState,
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl SyncController {
    /// Creates a controller with an empty state.
    #[must_use]
    pub fn new(notice_ttl: Duration) -> Self {
        Self {
            state: SyncState::new(notice_ttl),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SyncState {
        &self.state
    }

    /// The create-form draft, for editing.
    pub const fn draft_mut(&mut self) -> &mut Draft {
        &mut self.state.draft
    }

    /// Starts a full reload unless a request is outstanding.
    pub fn load(&mut self) -> Option<NetCommand> {
        if self.state.is_busy() {
            return None;
        }
        self.state.begin();
        Some(NetCommand::Load)
    }

    /// Starts a create from the current draft.
    ///
    /// A blank title is rejected locally and no command is issued.
    pub fn create(&mut self, now: Instant) -> Option<NetCommand> {
        let request = self.state.draft.to_request();
        self.submit(request, now)
    }

    /// Starts a create from an explicit request, bypassing the draft.
    pub fn submit(&mut self, request: CreateItemRequest, now: Instant) -> Option<NetCommand> {
        if self.state.is_busy() {
            return None;
        }
        if let Err(e) = request.validate() {
            self.state.reject(&ApiClientError::Validation(e), now);
            return None;
        }
        self.state.begin();
        Some(NetCommand::Create(request))
    }

    /// Starts archiving the item with `id`.
    pub fn archive(&mut self, id: &str) -> Option<NetCommand> {
        if self.state.is_busy() {
            return None;
        }
        self.state.begin();
        Some(NetCommand::Archive(id.to_string()))
    }

    /// Applies the outcome of a command issued by this controller.
    pub fn apply(&mut self, event: NetEvent, now: Instant) {
        match event {
            NetEvent::Loaded(result) => {
                if let Ok(listing) = &result {
                    tracing::debug!(count = listing.count, "items loaded");
                }
                self.state.finish_load(result, now);
            }
            NetEvent::Created(result) => self.state.finish_create(result, now),
            NetEvent::Archived { id, result } => {
                if let Err(e) = &result {
                    tracing::warn!(id = %id, error = %e, "archive failed");
                }
                self.state.finish_archive(&id, result, now);
            }
            NetEvent::Probed { location, result } => {
                self.state.finish_probe(&location, &result, now);
            }
        }
    }

    /// Records that `cmd` never reached the net task.
    pub fn undeliverable(&mut self, cmd: NetCommand, reason: &str, now: Instant) {
        let err = || ApiClientError::Server(reason.to_string());
        match cmd {
            NetCommand::Load => self.state.finish_load(Err(err()), now),
            NetCommand::Create(_) => self.state.finish_create(Err(err()), now),
            NetCommand::Archive(id) => self.state.finish_archive(&id, Err(err()), now),
            NetCommand::Probe => self.state.reject(&err(), now),
            NetCommand::Shutdown => {}
        }
    }

    /// The notice on `kind`'s channel, if still visible at `now`.
    #[must_use]
    pub fn notice(&self, kind: NoticeKind, now: Instant) -> Option<&str> {
        self.state.notice(kind, now)
    }

    /// Drops expired notices. Returns `true` if any changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        self.state.expire(now)
    }
}
