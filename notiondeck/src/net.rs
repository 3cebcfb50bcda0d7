//! Networking coordinator for wiring the TUI to the proxy.
//!
//! This module bridges the synchronous TUI event loop (crossterm poll-based)
//! with the async [`ItemsApi`]. It spawns a background tokio task and
//! communicates with the main thread via [`NetCommand`] / [`NetEvent`]
//! channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── NetEvent ───  tokio background tasks
//!                     ─── NetCommand →
//! ```
//!
//! Every command runs to completion on its own task and answers with one
//! event carrying the raw result. Nothing is cancelled or retried; the
//! application's busy flag decides what may be sent.

use std::sync::Arc;

use notiondeck_proto::item::{CreateItemRequest, Item};
use tokio::sync::mpsc;

use crate::api::{ApiClientError, Health, ItemListing, ItemsApi};

/// Commands sent from the TUI main loop to the networking background tasks.
#[derive(Debug)]
pub enum NetCommand {
    /// Fetch the whole list.
    Load,
    /// Create an item.
    Create(CreateItemRequest),
    /// Archive the item with this id.
    Archive(String),
    /// Check that the proxy answers.
    Probe,
    /// Gracefully shut down the networking tasks.
    Shutdown,
}

/// Events sent from the networking background tasks to the TUI main loop.
#[derive(Debug)]
pub enum NetEvent {
    /// Outcome of [`NetCommand::Load`].
    Loaded(Result<ItemListing, ApiClientError>),
    /// Outcome of [`NetCommand::Create`].
    Created(Result<Item, ApiClientError>),
    /// Outcome of [`NetCommand::Archive`].
    Archived {
        /// The id that was archived.
        id: String,
        /// Acknowledgment or failure.
        result: Result<String, ApiClientError>,
    },
    /// Outcome of [`NetCommand::Probe`].
    Probed {
        /// Where the proxy was expected.
        location: String,
        /// Health response or failure.
        result: Result<Health, ApiClientError>,
    },
}

/// Configuration for the networking layer.
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Spawn the command handler and return channel handles.
///
/// Must be called from within a tokio runtime.
pub fn spawn_net<A>(api: A, config: &NetConfig) -> (mpsc::Sender<NetCommand>, mpsc::Receiver<NetEvent>)
where
    A: ItemsApi + 'static,
{
    let capacity = config.channel_capacity.max(1);
    let (cmd_tx, cmd_rx) = mpsc::channel::<NetCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<NetEvent>(capacity);

    tokio::spawn(command_handler(Arc::new(api), cmd_rx, evt_tx));

    (cmd_tx, evt_rx)
}

/// Background task: handle commands from the TUI main loop.
///
/// Each command gets its own task so a probe never waits behind a slow
/// list call.
async fn command_handler<A>(
    api: Arc<A>,
    mut cmd_rx: mpsc::Receiver<NetCommand>,
    evt_tx: mpsc::Sender<NetEvent>,
) where
    A: ItemsApi + 'static,
{
    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, NetCommand::Shutdown) {
            tracing::info!("net command handler shutting down");
            break;
        }
        tracing::debug!(command = ?cmd, "dispatching");
        let api = Arc::clone(&api);
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            if let Some(event) = run(api.as_ref(), cmd).await
                && evt_tx.send(event).await.is_err()
            {
                tracing::debug!("event receiver dropped");
            }
        });
    }
}

async fn run<A: ItemsApi>(api: &A, cmd: NetCommand) -> Option<NetEvent> {
    let event = match cmd {
        NetCommand::Load => NetEvent::Loaded(api.list().await),
        NetCommand::Create(request) => NetEvent::Created(api.create(&request).await),
        NetCommand::Archive(id) => {
            let result = api.archive(&id).await;
            NetEvent::Archived { id, result }
        }
        NetCommand::Probe => NetEvent::Probed {
            location: api.location(),
            result: api.health().await,
        },
        NetCommand::Shutdown => return None,
    };
    Some(event)
}
