//! # Store Error Types
//!
//! Error types for snapshot and configuration loading.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io / serde_json / toml errors                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  anyhow::Error (rxdist-cli) ← Printed with its context chain           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A scheme that fails to parse is NOT an error: the loader skips it and
//! records it in the load report.

use std::path::PathBuf;

use thiserror::Error;

/// Snapshot and configuration errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is missing.
    ///
    /// ## When This Occurs
    /// - `--snapshot` points at a typo
    /// - `rxdist-seed` has not been run yet
    #[error("Snapshot not found at {}", .0.display())]
    SnapshotMissing(PathBuf),

    /// Snapshot JSON is not valid, or a non-scheme record is malformed.
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// rxdist.toml could not be parsed.
    #[error("Invalid config file: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("Config serialization failed: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Config parsed but holds an unusable value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No place to save the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Lookup by id found nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
