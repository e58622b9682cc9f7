//! # rxdist-store: Snapshot & Configuration Layer for rxdist
//!
//! Everything that touches the file system: the JSON record snapshot and the
//! `rxdist.toml` settings file.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          rxdist Data Flow                               │
//! │                                                                         │
//! │  rxdist-cli (evaluate / valuate / report ...)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   rxdist-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  RxdistConfig │    │   Snapshot    │    │  LoadReport  │  │   │
//! │  │   │  (config.rs)  │    │ (snapshot.rs) │    │  + Problems  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ defaults      │    │ products      │    │ skipped      │  │   │
//! │  │   │ rxdist.toml   │───►│ schemes       │───►│ schemes,     │  │   │
//! │  │   │ RXDIST_* env  │    │ batches ...   │    │ field issues │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rxdist-core (pure evaluation over &[Scheme], &[InventoryBatch])       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rxdist_store::{RxdistConfig, Snapshot};
//!
//! let config = RxdistConfig::load(None)?;
//! let (snapshot, report) = Snapshot::load(config.snapshot_path())?;
//! for skipped in &report.skipped_schemes {
//!     eprintln!("scheme #{} skipped: {}", skipped.index, skipped.reason);
//! }
//! println!("{} products", snapshot.products.len());
//! # Ok::<(), rxdist_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::RxdistConfig;
pub use error::{StoreError, StoreResult};
pub use snapshot::{LoadReport, Problem, SkippedScheme, Snapshot};
