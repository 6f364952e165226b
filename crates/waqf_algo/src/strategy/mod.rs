//! Allocation strategies (simple / balanced / advanced).
//!
//! Every strategy returns a new `Portfolio`; items are never added, removed
//! or reordered, only their `allocation` and `total_amount` are rewritten and
//! the portfolio's `allocation_mode` is replaced.

pub mod simple;
pub mod balanced;
pub mod advanced;

use waqf_core::{AllocationMode, Portfolio};

/// Re-apply whatever mode `portfolio` is in (after a total change or a
/// cause-directory refresh).
pub fn recompute(portfolio: &Portfolio) -> Portfolio {
    match &portfolio.allocation_mode {
        AllocationMode::Simple { waqf_type } => simple::apply_simple(portfolio, *waqf_type),
        AllocationMode::Balanced { global_allocation } => balanced::apply_balanced(portfolio, global_allocation),
        AllocationMode::Advanced { .. } => advanced::apply_advanced(portfolio),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use waqf_core::{Cause, Params, Portfolio, WaqfType};

    pub fn cause(id: &str, types: &[WaqfType]) -> Cause {
        Cause::new(id.parse().unwrap(), format!("Cause {id}"), types.iter().copied())
    }

    pub fn portfolio(total: f64, causes: Vec<Cause>) -> Portfolio {
        Portfolio::from_causes(causes, total, &Params::default())
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use waqf_core::{WaqfType::*, WaqfTypeSplit};

    #[test]
    fn recompute_dispatches_on_mode() {
        let p = portfolio(900.0, vec![cause("a", &[Permanent]), cause("b", &[TemporaryRevolving])]);
        // from_causes defaults to balanced with the equal split.
        let out = recompute(&p);
        assert!((out.items[0].total_amount - 900.0 * 33.33 / 66.67).abs() < 1e-9);

        let simple = simple::apply_simple(&p, TemporaryRevolving);
        let again = recompute(&simple);
        assert_eq!(again, simple);
        assert_eq!(again.items[1].allocation, WaqfTypeSplit::only(TemporaryRevolving));
    }
}
