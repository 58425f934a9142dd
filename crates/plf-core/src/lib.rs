//! Playlist Filters Core Library
//!
//! This crate holds everything about the playlist filtering feature that does
//! not touch the DOM: filter state and evaluation, the diacritic-insensitive
//! text search, duration parsing and bucketing, the channel registry, and the
//! selector/bucket configuration that the wasm side injects at startup.
//!
//! # Architecture
//!
//! The engine never owns page data. Each filter pass, the DOM layer re-reads
//! every live playlist item and hands the engine a borrowed [`VideoFields`]
//! view per item; the engine answers with a visibility decision. That keeps a
//! pass idempotent and order-independent across items, and keeps this crate
//! testable with plain `cargo test`.
//!
//! # Modules
//!
//! - `config`: selector roles and duration bucket configuration
//! - `duration`: `MM:SS` / `HH:MM:SS` parsing, bucket membership, formatting
//! - `engine`: filter state transitions and the per-item visibility decision
//! - `page`: video id extraction and watch-session URL composition
//! - `registry`: distinct channel names seen on the current playlist view
//! - `search`: diacritic-insensitive tokenized text matching
//! - `types`: shared type definitions

pub mod config;
pub mod duration;
pub mod engine;
pub mod page;
pub mod registry;
pub mod search;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, DurationBucket, SelectorConfig};
pub use engine::FilterEngine;
pub use registry::ChannelRegistry;
pub use types::{ActiveFilters, FilterKey, FilterState, VideoFields, VideoStats};
