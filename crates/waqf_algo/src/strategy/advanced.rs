//! Advanced mode: manual, two independent levels.
//!
//! - Level 1: each cause carries a portfolio share (percent of the total).
//!   On entering the mode every cause gets `100 / n`. Amounts are
//!   `total * share / 100`. Shares are never re-normalized here.
//! - Level 2: each cause's own split is edited directly. Unsupported types
//!   are forced to 0 on every recompute; the rest is never re-normalized.
//!
//! Sums that drift from 100 are reported by validation, not corrected.

use std::collections::BTreeMap;

use waqf_core::{AllocationMode, CauseId, Portfolio, PortfolioItem, WaqfType, EQUAL_SPLIT_FALLBACK};

use crate::normalize::allocation_for_cause;
use crate::EngineError;

/// Enter (or stay in) advanced mode and recompute amounts from the shares.
pub fn apply_advanced(portfolio: &Portfolio) -> Portfolio {
    match &portfolio.allocation_mode {
        AllocationMode::Advanced { portfolio_shares } if !portfolio_shares.is_empty() => {
            recompute_with(portfolio, portfolio_shares)
        }
        _ => enter_advanced(portfolio),
    }
}

/// Seed equal shares and carry the current per-cause splits over. A cause
/// whose supported mass is 0 (fresh portfolio, or a split that only used
/// types it does not accept) starts from the even split over its types.
/// Existing shares are discarded, so this doubles as "reset shares".
pub fn enter_advanced(portfolio: &Portfolio) -> Portfolio {
    let n = portfolio.items.len();
    let equal = if n == 0 { 0.0 } else { 100.0 / n as f64 };
    let shares: BTreeMap<CauseId, f64> = portfolio
        .items
        .iter()
        .map(|it| (it.cause.id.clone(), equal))
        .collect();

    let items = portfolio
        .items
        .iter()
        .map(|it| {
            let supported = &it.cause.supported_waqf_types;
            let masked = it.allocation.masked(supported);
            let allocation = if masked.total() > 0.0 {
                masked
            } else {
                allocation_for_cause(&EQUAL_SPLIT_FALLBACK, supported)
            };
            PortfolioItem { allocation, ..it.clone() }
        })
        .collect();

    let seeded = Portfolio { items, ..portfolio.clone() };
    recompute_with(&seeded, &shares)
}

/// Shares for causes no longer in the portfolio are dropped; causes without a
/// share are treated as 0%.
fn recompute_with(portfolio: &Portfolio, shares: &BTreeMap<CauseId, f64>) -> Portfolio {
    let mut kept = BTreeMap::new();
    let items = portfolio
        .items
        .iter()
        .map(|it| {
            let share = shares.get(&it.cause.id).copied().unwrap_or(0.0);
            kept.insert(it.cause.id.clone(), share);
            PortfolioItem {
                cause: it.cause.clone(),
                allocation: it.allocation.masked(&it.cause.supported_waqf_types),
                total_amount: portfolio.total_amount * share / 100.0,
            }
        })
        .collect();

    Portfolio {
        items,
        allocation_mode: AllocationMode::Advanced { portfolio_shares: kept },
        ..portfolio.clone()
    }
}

fn ensure_member(portfolio: &Portfolio, id: &CauseId) -> Result<(), EngineError> {
    if portfolio.contains(id) { Ok(()) } else { Err(EngineError::UnknownCause(id.clone())) }
}

/// Donor edit (level 1): set one cause's share of the total, then recompute.
pub fn set_portfolio_share(portfolio: &Portfolio, id: &CauseId, percent: f64) -> Result<Portfolio, EngineError> {
    ensure_member(portfolio, id)?;
    let current = apply_advanced(portfolio);
    let mut shares = match current.allocation_mode {
        AllocationMode::Advanced { ref portfolio_shares } => portfolio_shares.clone(),
        _ => BTreeMap::new(),
    };
    shares.insert(id.clone(), percent);
    Ok(recompute_with(&current, &shares))
}

/// Donor edit (level 2): set one component of one cause's split, then
/// recompute. Writing to a type the cause does not accept has no effect.
pub fn set_cause_allocation(
    portfolio: &Portfolio,
    id: &CauseId,
    waqf_type: WaqfType,
    percent: f64,
) -> Result<Portfolio, EngineError> {
    ensure_member(portfolio, id)?;
    let mut current = apply_advanced(portfolio);
    if let Some(it) = current.items.iter_mut().find(|it| &it.cause.id == id) {
        it.allocation[waqf_type] = percent;
    }
    let shares = match &current.allocation_mode {
        AllocationMode::Advanced { portfolio_shares } => portfolio_shares.clone(),
        _ => BTreeMap::new(),
    };
    Ok(recompute_with(&current, &shares))
}
