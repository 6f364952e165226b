//! Portfolio snapshot: items, total amount and the mode-tagged allocation state.
//!
//! Mode-specific data lives in [`AllocationMode`]: the portfolio shares of
//! advanced mode exist only inside `AllocationMode::Advanced`, so leaving
//! advanced mode drops them.

use std::collections::{BTreeMap, BTreeSet};

use crate::cause::Cause;
use crate::tokens::CauseId;
use crate::variables::{ModeKind, Params};
use crate::waqf::{WaqfType, WaqfTypeSplit, EQUAL_SPLIT_FALLBACK};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happens to temporary waqf principal once its lock period elapses.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExpirationPreference {
    #[default]
    ReturnToDonor,
    Renew,
    ConvertToPermanent,
}

/// Donor-selected strategy and the data only that strategy needs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum AllocationMode {
    /// One waqf type for everything.
    Simple {
        #[cfg_attr(feature = "serde", serde(rename = "waqfType"))]
        waqf_type: WaqfType,
    },
    /// One global mix applied proportionally.
    Balanced {
        #[cfg_attr(feature = "serde", serde(rename = "globalAllocation"))]
        global_allocation: WaqfTypeSplit,
    },
    /// Manual per-cause control; `portfolio_shares` are percentages of the total.
    Advanced {
        #[cfg_attr(feature = "serde", serde(rename = "portfolioShares", default))]
        portfolio_shares: BTreeMap<CauseId, f64>,
    },
}

impl AllocationMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            AllocationMode::Simple { .. } => ModeKind::Simple,
            AllocationMode::Balanced { .. } => ModeKind::Balanced,
            AllocationMode::Advanced { .. } => ModeKind::Advanced,
        }
    }
}

impl Default for AllocationMode {
    fn default() -> Self {
        AllocationMode::Balanced { global_allocation: EQUAL_SPLIT_FALLBACK }
    }
}

/// One cause's participation in a portfolio. `total_amount` is derived by the engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PortfolioItem {
    pub cause: Cause,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allocation: WaqfTypeSplit,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_amount: f64,
}

impl PortfolioItem {
    pub fn new(cause: Cause) -> Self {
        Self { cause, allocation: WaqfTypeSplit::ZERO, total_amount: 0.0 }
    }
}

#[cfg(feature = "serde")]
fn default_lock_period() -> u32 { crate::variables::DEFAULT_LOCK_PERIOD_MONTHS }

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Portfolio {
    pub items: Vec<PortfolioItem>,
    pub total_amount: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allocation_mode: AllocationMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_expiration_preference: ExpirationPreference,
    #[cfg_attr(feature = "serde", serde(default = "default_lock_period"))]
    pub lock_period_months: u32,
}

impl Portfolio {
    /// Fresh portfolio from selected causes. Duplicate causes are dropped
    /// (first wins); allocations stay zeroed until the engine recomputes.
    pub fn from_causes(causes: impl IntoIterator<Item = Cause>, total_amount: f64, params: &Params) -> Self {
        let items: Vec<PortfolioItem> = causes.into_iter().map(PortfolioItem::new).collect();
        let allocation_mode = match params.initial_mode {
            ModeKind::Simple => AllocationMode::Simple { waqf_type: WaqfType::Permanent },
            ModeKind::Balanced => AllocationMode::default(),
            ModeKind::Advanced => AllocationMode::Advanced { portfolio_shares: BTreeMap::new() },
        };
        let (portfolio, _dropped) = Self {
            items,
            total_amount,
            allocation_mode,
            default_expiration_preference: params.default_expiration_preference,
            lock_period_months: params.lock_period_months,
        }
        .dedup_items();
        portfolio
    }

    pub fn item(&self, id: &CauseId) -> Option<&PortfolioItem> {
        self.items.iter().find(|it| &it.cause.id == id)
    }

    pub fn contains(&self, id: &CauseId) -> bool {
        self.item(id).is_some()
    }

    /// Advanced-mode share of `id`; `None` outside advanced mode or for unknown ids.
    pub fn portfolio_share(&self, id: &CauseId) -> Option<f64> {
        match &self.allocation_mode {
            AllocationMode::Advanced { portfolio_shares } => portfolio_shares.get(id).copied(),
            _ => None,
        }
    }

    /// Ids that occur more than once, each reported once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<CauseId> {
        let mut seen = BTreeSet::new();
        let mut dups: Vec<CauseId> = Vec::new();
        for it in &self.items {
            if !seen.insert(&it.cause.id) && !dups.contains(&it.cause.id) {
                dups.push(it.cause.id.clone());
            }
        }
        dups
    }

    /// Keep the first occurrence of each cause id. Returns the ids of the
    /// discarded items (one entry per discarded item) so callers can log them.
    pub fn dedup_items(mut self) -> (Self, Vec<CauseId>) {
        let mut seen = BTreeSet::new();
        let mut dropped = Vec::new();
        self.items.retain(|it| {
            if seen.insert(it.cause.id.clone()) {
                true
            } else {
                dropped.push(it.cause.id.clone());
                false
            }
        });
        (self, dropped)
    }
}
