//! crates/waqf_io/src/lib.rs
//! Single-source-of-truth I/O crate for the waqf engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Loaders for portfolio, catalog, cause-selection and params files.
//! - Canonical JSON + SHA-256 for snapshot digests.
//! - `SnapshotStore` (get/set by session) with memory and file backends.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for waqf_io (used by canonical_json/hasher/schema/loader/store).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Snapshot envelope failed JSON Schema validation.
    #[error("schema error at {pointer}: {msg}")]
    Schema { pointer: String, msg: String },

    /// Digest mismatch or hashing failure.
    #[error("hash error: {0}")]
    Hash(String),

    /// Generic validation / invariants (domains, non-finite amounts).
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; default to root.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

impl From<hasher::HashError> for IoError {
    fn from(e: hasher::HashError) -> Self {
        IoError::Hash(e.to_string())
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod schema;
pub mod loader;
pub mod store;
pub mod snapshot;

/* ---------------- Public prelude ----------------
   Lightweight re-exports so downstream crates can do:
     use waqf_io::prelude::*;
------------------------------------------------- */

pub mod prelude {
    pub use crate::{IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_json_bytes, write_canonical_file};
    pub use crate::hasher::{sha256_canonical, sha256_hex};
    pub use crate::loader::{load_catalog, load_causes, load_params, load_portfolio_file};
    pub use crate::snapshot::{load_portfolio, save_portfolio};
    pub use crate::store::{FileStore, MemoryStore, SnapshotStore};
}
