//! `NotionDeck` proxy library.
//!
//! Exposes the proxy server for use in tests and embedding. The server
//! accepts item CRUD requests over a small REST surface and translates them
//! into Notion API calls against a single database.

pub mod adapter;
pub mod config;
pub mod server;
pub mod upstream;
