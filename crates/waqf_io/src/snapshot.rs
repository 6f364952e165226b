//! Portfolio snapshots under a session key.
//!
//! Envelope: `{"schemaVersion":"1","sha256":<hex>,"portfolio":{..}}` where the
//! digest covers the canonical JSON of the `portfolio` member only.
//! Loading checks schema, then digest, then drops duplicate causes.

use serde_json::{json, Value};
use waqf_core::{AllocationMode, Portfolio, SessionId};

use crate::hasher::{sha256_canonical_value, verify_canonical_value};
use crate::loader::dedup_with_warnings;
use crate::schema::{validate_snapshot_envelope, SNAPSHOT_SCHEMA_VERSION};
use crate::store::SnapshotStore;
use crate::{IoError, IoResult};

/// Build the stored envelope for `p`.
pub fn to_envelope(p: &Portfolio) -> IoResult<Value> {
    ensure_finite(p)?;
    let portfolio = serde_json::to_value(p)?;
    let sha256 = sha256_canonical_value(&portfolio);
    Ok(json!({
        "schemaVersion": SNAPSHOT_SCHEMA_VERSION,
        "sha256": sha256,
        "portfolio": portfolio,
    }))
}

/// Check and unwrap a stored envelope.
pub fn from_envelope(envelope: &Value) -> IoResult<Portfolio> {
    validate_snapshot_envelope(envelope)?;

    // Both members are guaranteed by the schema.
    let expected = envelope.get("sha256").and_then(Value::as_str).unwrap_or_default();
    let body = envelope.get("portfolio").cloned().unwrap_or(Value::Null);
    if !verify_canonical_value(&body, expected)? {
        return Err(IoError::Hash(format!(
            "snapshot digest mismatch: stored {expected}, computed {}",
            sha256_canonical_value(&body)
        )));
    }

    let p: Portfolio = serde_json::from_value(body)
        .map_err(|e| IoError::Json { pointer: "/portfolio".into(), msg: e.to_string() })?;
    Ok(dedup_with_warnings(p))
}

pub fn save_portfolio<S: SnapshotStore + ?Sized>(store: &mut S, key: &SessionId, p: &Portfolio) -> IoResult<()> {
    let envelope = to_envelope(p)?;
    store.set(key, &envelope)?;
    tracing::info!(session = %key, items = p.items.len(), "portfolio saved");
    Ok(())
}

/// `Ok(None)` when nothing is stored under `key`.
pub fn load_portfolio<S: SnapshotStore + ?Sized>(store: &S, key: &SessionId) -> IoResult<Option<Portfolio>> {
    match store.get(key)? {
        Some(envelope) => from_envelope(&envelope).map(Some),
        None => Ok(None),
    }
}

// serde_json writes non-finite floats as `null`, which would not load back.
fn ensure_finite(p: &Portfolio) -> IoResult<()> {
    let bad = |what: String| Err(IoError::Invalid(format!("non-finite number in {what}")));
    if !p.total_amount.is_finite() {
        return bad("totalAmount".into());
    }
    for it in &p.items {
        if !it.total_amount.is_finite() || it.allocation.iter().any(|(_, v)| !v.is_finite()) {
            return bad(format!("item {}", it.cause.id));
        }
    }
    match &p.allocation_mode {
        AllocationMode::Balanced { global_allocation } if global_allocation.iter().any(|(_, v)| !v.is_finite()) => {
            bad("globalAllocation".into())
        }
        AllocationMode::Advanced { portfolio_shares } if portfolio_shares.values().any(|v| !v.is_finite()) => {
            bad("portfolioShares".into())
        }
        _ => Ok(()),
    }
}
