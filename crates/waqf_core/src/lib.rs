//! waqf_core: core types, domains and tokens for the waqf allocation engine.
//!
//! This crate is **I/O-free**. It defines the stable types shared across the
//! workspace (`waqf_algo`, `waqf_io`, `waqf_pipeline`, `waqf_cli`).
//!
//! - Waqf types and percentage splits (`WaqfType`, `WaqfTypeSplit`)
//! - Causes and the read-only cause directory
//! - Portfolio snapshot with a mode-tagged `AllocationMode`
//! - Strict tokens: `CauseId`, `SessionId`, `AdminId`, `RequestId`
//! - `Params` for new portfolios (+ domain checks)
//! - Two-stage admin request workflow (propose → approve/reject)
//!
//! Serialization derives are gated behind the `serde` feature (on by default).

#![forbid(unsafe_code)]

pub mod errors;
pub mod tokens;
pub mod waqf;
pub mod cause;
pub mod portfolio;
pub mod variables;
pub mod requests;

pub use errors::CoreError;
pub use tokens::{AdminId, CauseId, RequestId, SessionId};
pub use waqf::{WaqfType, WaqfTypeSet, WaqfTypeSplit, EQUAL_SPLIT_FALLBACK, SUM_TOLERANCE};
pub use cause::{Cause, CauseDirectory, CauseRecord};
pub use portfolio::{AllocationMode, ExpirationPreference, Portfolio, PortfolioItem};
pub use variables::{ModeKind, Params};
