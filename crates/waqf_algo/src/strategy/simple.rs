//! Simple mode: one waqf type for the whole donation.
//!
//! - Causes that accept `waqf_type` split the total equally and get 100% of
//!   that type.
//! - Causes that do not accept it receive 0; their allocation is the even
//!   split over what they *do* accept (display convention only).
//! - No supporters at all: every cause receives 0.

use waqf_core::{AllocationMode, Portfolio, PortfolioItem, WaqfType, WaqfTypeSplit, EQUAL_SPLIT_FALLBACK};

use crate::normalize::allocation_for_cause;

pub fn apply_simple(portfolio: &Portfolio, waqf_type: WaqfType) -> Portfolio {
    let supporting = portfolio
        .items
        .iter()
        .filter(|it| it.cause.supports(waqf_type))
        .count();
    let per_cause = if supporting == 0 {
        0.0
    } else {
        portfolio.total_amount / supporting as f64
    };

    let items = portfolio
        .items
        .iter()
        .map(|it| {
            if it.cause.supports(waqf_type) {
                PortfolioItem {
                    cause: it.cause.clone(),
                    allocation: WaqfTypeSplit::only(waqf_type),
                    total_amount: per_cause,
                }
            } else {
                PortfolioItem {
                    cause: it.cause.clone(),
                    allocation: allocation_for_cause(&EQUAL_SPLIT_FALLBACK, &it.cause.supported_waqf_types),
                    total_amount: 0.0,
                }
            }
        })
        .collect();

    Portfolio {
        items,
        allocation_mode: AllocationMode::Simple { waqf_type },
        ..portfolio.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::fixtures::*;
    use waqf_core::WaqfType::*;

    #[test]
    fn supporters_share_equally() {
        let p = portfolio(
            900.0,
            vec![
                cause("a", &[Permanent, TemporaryConsumable]),
                cause("b", &[Permanent]),
                cause("c", &[TemporaryConsumable, TemporaryRevolving]),
            ],
        );
        let out = apply_simple(&p, Permanent);
        assert_eq!(out.items[0].total_amount, 450.0);
        assert_eq!(out.items[1].total_amount, 450.0);
        assert_eq!(out.items[0].allocation, WaqfTypeSplit::only(Permanent));

        let c = &out.items[2];
        assert_eq!(c.total_amount, 0.0);
        assert_eq!(c.allocation.permanent, 0.0);
        assert!(c.allocation.sums_to_100());
        assert_eq!(out.allocation_mode, AllocationMode::Simple { waqf_type: Permanent });
    }

    #[test]
    fn no_supporters_means_nobody_gets_money() {
        let p = portfolio(500.0, vec![cause("a", &[Permanent]), cause("b", &[TemporaryConsumable])]);
        let out = apply_simple(&p, TemporaryRevolving);
        assert!(out.items.iter().all(|it| it.total_amount == 0.0));
    }

    #[test]
    fn cause_without_types_gets_fallback_split() {
        let p = portfolio(100.0, vec![cause("empty", &[])]);
        let out = apply_simple(&p, Permanent);
        assert_eq!(out.items[0].total_amount, 0.0);
        assert_eq!(out.items[0].allocation, EQUAL_SPLIT_FALLBACK);
    }

    #[test]
    fn leaving_advanced_drops_shares() {
        let p = portfolio(100.0, vec![cause("a", &[Permanent])]);
        let adv = crate::strategy::advanced::apply_advanced(&p);
        assert!(adv.portfolio_share(&"a".parse().unwrap()).is_some());
        let out = apply_simple(&adv, Permanent);
        assert_eq!(out.portfolio_share(&"a".parse().unwrap()), None);
    }
}
