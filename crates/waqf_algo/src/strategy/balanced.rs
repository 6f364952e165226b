//! Balanced mode: one global mix applied proportionally.
//!
//! Each cause's money is proportional to its un-normalized weight under the
//! global mix; its own split is the global mix restricted to what it accepts,
//! normalized to 100. When every weight is 0 the total is split equally.

use waqf_core::{AllocationMode, Portfolio, PortfolioItem, WaqfTypeSplit};

use crate::normalize::{allocation_for_cause, compute_weight};

pub fn apply_balanced(portfolio: &Portfolio, global: &WaqfTypeSplit) -> Portfolio {
    let weights: Vec<f64> = portfolio
        .items
        .iter()
        .map(|it| compute_weight(global, &it.cause.supported_waqf_types))
        .collect();
    let total_weight: f64 = weights.iter().sum();
    let n = portfolio.items.len();

    let items = portfolio
        .items
        .iter()
        .zip(&weights)
        .map(|(it, &w)| {
            let total_amount = if total_weight > 0.0 {
                portfolio.total_amount * w / total_weight
            } else {
                portfolio.total_amount / n as f64
            };
            PortfolioItem {
                cause: it.cause.clone(),
                allocation: allocation_for_cause(global, &it.cause.supported_waqf_types),
                total_amount,
            }
        })
        .collect();

    Portfolio {
        items,
        allocation_mode: AllocationMode::Balanced { global_allocation: *global },
        ..portfolio.clone()
    }
}
