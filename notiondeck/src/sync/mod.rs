//! Client-side item cache and its reconciliation with the proxy.
//!
//! [`SyncState`] is the explicit state object and [`SyncController`] its only
//! driver: it turns user actions into [`NetCommand`](crate::net::NetCommand)s
//! and applies the results the background net task sends back.

pub mod controller;
pub mod notice;
pub mod state;

pub use controller::SyncController;
pub use notice::{DEFAULT_NOTICE_TTL, NoticeKind, NoticeSlot};
pub use state::{Draft, SyncState};
