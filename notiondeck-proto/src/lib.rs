//! Shared wire definitions for the `NotionDeck` REST surface.

pub mod envelope;
pub mod item;
