//! `NotionDeck`, a terminal client for a Notion-backed item list.

pub mod api;
pub mod app;
pub mod config;
pub mod net;
pub mod sync;
pub mod ui;
