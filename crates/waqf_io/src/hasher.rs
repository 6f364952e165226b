//! crates/waqf_io/src/hasher.rs
//!
//! SHA-256 digests over canonical JSON (sorted keys, compact, array order
//! preserved). Hex digests are **lowercase**.
//!
//! - `sha256_canonical(..)` for serializable values (goes through canonical_json).
//! - `sha256_canonical_value(..)` when the `Value` is already at hand.
//! - `sha256_hex(..)` for raw bytes.

#![forbid(unsafe_code)]

use digest::Digest;
use serde::Serialize;
use serde_json::{self as sj, Value};
use sha2::Sha256;
use thiserror::Error;

use crate::canonical_json::to_canonical_json_bytes;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("JSON serialization error: {0}")]
    Serde(#[from] sj::Error),

    #[error("invalid hex (expected lowercase 64-hex): {0}")]
    InvalidHex(String),
}

pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f'))
}

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over the canonical JSON bytes of an already-parsed value.
pub fn sha256_canonical_value(v: &Value) -> String {
    sha256_hex(&to_canonical_json_bytes(v))
}

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, HashError> {
    let v = sj::to_value(value)?;
    Ok(sha256_canonical_value(&v))
}

/// Compare `expected` against the canonical digest of `v`.
pub fn verify_canonical_value(v: &Value, expected: &str) -> Result<bool, HashError> {
    if !is_sha256_hex(expected) {
        return Err(HashError::InvalidHex(expected.to_string()));
    }
    Ok(sha256_canonical_value(v) == expected)
}
