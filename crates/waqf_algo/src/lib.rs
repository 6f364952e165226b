// crates/waqf_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Allocation engine. Pure functions over `waqf_core` values: every entry
//! point takes its input by reference and returns a new value.

use core::fmt;

pub use waqf_core::{
    AllocationMode, Cause, CauseId, Portfolio, PortfolioItem, WaqfType, WaqfTypeSet, WaqfTypeSplit,
    EQUAL_SPLIT_FALLBACK, SUM_TOLERANCE,
};

// ----------------------------- Errors ------------------------------------------------

/// Only the donor-edit operations can fail; the strategies are total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Edit addressed a cause that is not in the portfolio.
    UnknownCause(CauseId),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownCause(id) => write!(f, "cause not in portfolio: {id}"),
        }
    }
}

impl std::error::Error for EngineError {}

// ----------------------------- File modules ------------------------------------------

pub mod normalize;
pub mod slider;
pub mod strategy;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use normalize::{allocation_for_cause, compute_weight, normalize};
pub use slider::adjust_global_slider;
pub use strategy::{
    advanced::{apply_advanced, enter_advanced, set_cause_allocation, set_portfolio_share},
    balanced::apply_balanced,
    recompute,
    simple::apply_simple,
};
