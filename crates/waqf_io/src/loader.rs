//! Loader: read local JSON artifacts (portfolio, catalog, cause selection,
//! params) into typed `waqf_core` values. No network I/O.
//!
//! Every loader has a `parse_*` twin over `&str` so callers that already
//! hold the text (stores, tests) share the same checks.

#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use waqf_core::{
    variables::{self, Params},
    Cause, CauseDirectory, CauseRecord, Portfolio,
};

use crate::{IoError, IoResult};

/// Inputs larger than this are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

// ----------------------------- Targeted loaders -----------------------------

pub fn load_portfolio_file(path: &Path) -> IoResult<Portfolio> {
    parse_portfolio(&read_text_with_limits(path)?)
}

pub fn load_catalog(path: &Path) -> IoResult<CauseDirectory> {
    parse_catalog(&read_text_with_limits(path)?)
}

pub fn load_causes(path: &Path) -> IoResult<Vec<Cause>> {
    parse_causes(&read_text_with_limits(path)?)
}

pub fn load_params(path: &Path) -> IoResult<Params> {
    parse_params(&read_text_with_limits(path)?)
}

// ----------------------------- Parsers -----------------------------

/// Parse a portfolio document, either bare or wrapped as `{portfolio, validation}`
/// the way engine commands emit it. Duplicate causes are dropped (first wins)
/// with one warning per dropped item.
pub fn parse_portfolio(text: &str) -> IoResult<Portfolio> {
    let p: Portfolio = from_value(unwrap_engine_output(parse_value(text)?))?;
    Ok(dedup_with_warnings(p))
}

/// Catalog rows: `[{ "causeId": .., "supportedWaqfTypes": [..] }, ..]`.
pub fn parse_catalog(text: &str) -> IoResult<CauseDirectory> {
    let rows: Vec<CauseRecord> = from_value(parse_value(text)?)?;
    Ok(CauseDirectory::from_records(rows))
}

/// Selected causes for a new portfolio: `[{ "id", "name", "supportedWaqfTypes" }, ..]`.
/// A repeated id keeps its first entry; each later one is logged and dropped.
pub fn parse_causes(text: &str) -> IoResult<Vec<Cause>> {
    let causes: Vec<Cause> = from_value(parse_value(text)?)?;
    let mut seen = BTreeSet::new();
    Ok(causes
        .into_iter()
        .filter(|c| {
            let first = seen.insert(c.id.clone());
            if !first {
                tracing::warn!(cause = %c.id, "duplicate cause in selection; keeping first occurrence");
            }
            first
        })
        .collect())
}

pub fn parse_params(text: &str) -> IoResult<Params> {
    let ps: Params = from_value(parse_value(text)?)?;
    variables::validate_domains(&ps)
        .map_err(|e| IoError::Invalid(format!("parameter domain error: {e}")))?;
    Ok(ps)
}

/// Drop duplicate causes, logging each discarded item.
pub fn dedup_with_warnings(p: Portfolio) -> Portfolio {
    let (p, dropped) = p.dedup_items();
    for id in &dropped {
        tracing::warn!(cause = %id, "duplicate cause in portfolio; keeping first occurrence");
    }
    p
}

// ----------------------------- Helpers -----------------------------

fn read_text_with_limits(path: &Path) -> IoResult<String> {
    let meta = fs::metadata(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    if meta.len() > MAX_INPUT_BYTES {
        return Err(IoError::Invalid(format!(
            "{}: {} bytes exceeds limit of {MAX_INPUT_BYTES}",
            path.display(),
            meta.len()
        )));
    }
    tracing::debug!(path = %path.display(), bytes = meta.len(), "reading input");
    fs::read_to_string(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))
}

// A document with no `items` but a `portfolio` member is engine output.
fn unwrap_engine_output(v: Value) -> Value {
    match v {
        Value::Object(mut m) if !m.contains_key("items") => match m.remove("portfolio") {
            Some(inner) => inner,
            None => Value::Object(m),
        },
        other => other,
    }
}

fn parse_value(text: &str) -> IoResult<Value> {
    Ok(serde_json::from_str(text)?)
}

fn from_value<T: DeserializeOwned>(v: Value) -> IoResult<T> {
    serde_json::from_value(v).map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })
}
