//! # ql_core - Quake-style game log statistics
//!
//! Reconstructs per-match aggregate statistics (participating players, kill
//! counts per player, total kills) from a line-oriented game-server log in a
//! single sequential pass.
//!
//! ## Pipeline
//! - [`classifier`] turns one raw line into a typed [`LogEvent`]
//! - [`tracker`] folds events into per-match state with correct lifecycle
//!   handling (implicit finalize, dedup on end, world-kill scoring)
//! - [`cache`] keys parsed results by a SHA-256 fingerprint of the file
//!   bytes, so an unchanged log is never scanned twice
//! - [`ingest`] orchestrates fingerprint → cache → scan → store

pub mod cache;
pub mod classifier;
pub mod error;
pub mod ingest;
pub mod models;
pub mod tracker;

pub use cache::{fingerprint_file, ResultCache, CACHE_SCHEMA_VERSION};
pub use classifier::{classify, LogEvent};
pub use error::{CacheError, IngestError, Result};
pub use ingest::{scan, LogIngestor};
pub use models::{MatchStats, ResultSet};
pub use tracker::{MatchTracker, MATCH_ID_PREFIX, WORLD_PLAYER};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
