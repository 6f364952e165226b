//! crates/waqf_pipeline/src/validate.rs
//! Portfolio validation: a pure predicate set over one snapshot.
//! Never mutates, never fails; the caller decides whether to let the donor
//! proceed based on `ValidationReport::pass`.
//!
//! The "must total 100%" checks compare the sum rounded to the nearest
//! integer, so 99.6 passes and 99.4 does not.

use std::cmp::Ordering;

use serde::Serialize;
use waqf_core::{AllocationMode, CauseId, Portfolio, WaqfType, WaqfTypeSplit};

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Root,
    Field(&'static str),
    Cause(CauseId),
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(rename = "where")]
    pub where_: EntityRef,
}

/// `pass` = no `Error`; issues are sorted by (code, where, message).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self { pass: true, issues: Vec::new() }
    }
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

pub const SIMPLE_UNSUPPORTED_TYPE: &str = "Simple.UnsupportedTypeSelected";
pub const BALANCED_GLOBAL_NOT_100: &str = "Balanced.GlobalAllocationNot100";
pub const ADVANCED_SHARE_NOT_100: &str = "Advanced.PortfolioShareNot100";
pub const ADVANCED_CAUSE_NOT_100: &str = "Advanced.CauseAllocationNot100";
pub const PORTFOLIO_INVALID_AMOUNT: &str = "Portfolio.InvalidAmount";
pub const PORTFOLIO_INVALID_PERCENTAGE: &str = "Portfolio.InvalidPercentage";
pub const PORTFOLIO_DUPLICATE_CAUSE: &str = "Portfolio.DuplicateCause";
pub const PORTFOLIO_EMPTY: &str = "Portfolio.Empty";

/// Top-level entry point.
pub fn validate(p: &Portfolio) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    // A) Shape of the snapshot itself
    issues.extend(check_amount(p));
    issues.extend(check_items(p));
    issues.extend(check_percentages(p));

    // B) Mode-specific totals (skipped for an empty portfolio; Portfolio.Empty covers it)
    if !p.items.is_empty() {
        match &p.allocation_mode {
            AllocationMode::Simple { waqf_type } => issues.extend(check_simple(p, *waqf_type)),
            AllocationMode::Balanced { global_allocation } => issues.extend(check_balanced(global_allocation)),
            AllocationMode::Advanced { .. } => issues.extend(check_advanced(p)),
        }
    }

    sort_issues_stably(&mut issues);

    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

fn check_amount(p: &Portfolio) -> Vec<ValidationIssue> {
    if p.total_amount.is_finite() && p.total_amount >= 0.0 {
        return Vec::new();
    }
    vec![ValidationIssue {
        severity: Severity::Error,
        code: PORTFOLIO_INVALID_AMOUNT,
        message: format!("total amount must be a non-negative number (got {})", p.total_amount),
        where_: EntityRef::Field("totalAmount"),
    }]
}

fn check_items(p: &Portfolio) -> Vec<ValidationIssue> {
    if p.items.is_empty() {
        return vec![ValidationIssue {
            severity: Severity::Warning,
            code: PORTFOLIO_EMPTY,
            message: "portfolio has no causes".to_string(),
            where_: EntityRef::Root,
        }];
    }
    p.duplicate_ids()
        .into_iter()
        .map(|id| ValidationIssue {
            severity: Severity::Warning,
            code: PORTFOLIO_DUPLICATE_CAUSE,
            message: format!("cause {id} appears more than once"),
            where_: EntityRef::Cause(id),
        })
        .collect()
}

fn valid_pct(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

fn check_percentages(p: &Portfolio) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut bad = |where_: EntityRef, what: String| {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            code: PORTFOLIO_INVALID_PERCENTAGE,
            message: format!("{what} must be a non-negative percentage"),
            where_,
        })
    };

    for it in &p.items {
        for (t, v) in it.allocation.iter() {
            if !valid_pct(v) {
                bad(EntityRef::Cause(it.cause.id.clone()), format!("{} {} ({v})", it.cause.name, t));
            }
        }
    }
    match &p.allocation_mode {
        AllocationMode::Balanced { global_allocation } => {
            for (t, v) in global_allocation.iter() {
                if !valid_pct(v) {
                    bad(EntityRef::Field("globalAllocation"), format!("global {t} ({v})"));
                }
            }
        }
        AllocationMode::Advanced { portfolio_shares } => {
            for (id, v) in portfolio_shares {
                if !valid_pct(*v) {
                    bad(EntityRef::Cause(id.clone()), format!("portfolio share of {id} ({v})"));
                }
            }
        }
        AllocationMode::Simple { .. } => {}
    }
    issues
}

fn check_simple(p: &Portfolio, t: WaqfType) -> Vec<ValidationIssue> {
    let supporters = p.items.iter().filter(|it| it.cause.supports(t)).count();
    let n = p.items.len();
    if supporters == 0 {
        vec![ValidationIssue {
            severity: Severity::Error,
            code: SIMPLE_UNSUPPORTED_TYPE,
            message: format!("none of the selected causes accept {t}"),
            where_: EntityRef::Field("allocationMode.waqfType"),
        }]
    } else if supporters < n {
        let skipped: Vec<&str> = p
            .items
            .iter()
            .filter(|it| !it.cause.supports(t))
            .map(|it| it.cause.name.as_str())
            .collect();
        vec![ValidationIssue {
            severity: Severity::Warning,
            code: SIMPLE_UNSUPPORTED_TYPE,
            message: format!(
                "{supporters} of {n} causes accept {t}; these receive nothing: {}",
                skipped.join(", ")
            ),
            where_: EntityRef::Field("allocationMode.waqfType"),
        }]
    } else {
        Vec::new()
    }
}

fn check_balanced(global: &WaqfTypeSplit) -> Vec<ValidationIssue> {
    let sum = global.total();
    if rounds_to_100(sum) {
        return Vec::new();
    }
    vec![ValidationIssue {
        severity: Severity::Error,
        code: BALANCED_GLOBAL_NOT_100,
        message: format!("global allocation must total 100% (currently {sum:.2}%)"),
        where_: EntityRef::Field("globalAllocation"),
    }]
}

fn check_advanced(p: &Portfolio) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // Missing shares count as 0, matching the engine.
    let share_sum: f64 = p.items.iter().map(|it| p.portfolio_share(&it.cause.id).unwrap_or(0.0)).sum();
    if !rounds_to_100(share_sum) {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            code: ADVANCED_SHARE_NOT_100,
            message: format!("portfolio shares must total 100% (currently {share_sum:.2}%)"),
            where_: EntityRef::Field("portfolioShares"),
        });
    }

    for it in &p.items {
        let sum = it.allocation.total();
        if !rounds_to_100(sum) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: ADVANCED_CAUSE_NOT_100,
                message: format!("allocation for {} must total 100% (currently {sum:.2}%)", it.cause.name),
                where_: EntityRef::Cause(it.cause.id.clone()),
            });
        }
    }
    issues
}

fn rounds_to_100(sum: f64) -> bool {
    sum.round() == 100.0
}

// ------------------------------------------------------------------------------------------------
// Utilities
// ------------------------------------------------------------------------------------------------

fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| cmp_where(&a.where_, &b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}

fn cmp_where(a: &EntityRef, b: &EntityRef) -> Ordering {
    use EntityRef::*;
    fn rank(e: &EntityRef) -> u8 {
        match e {
            Root => 0,
            Field(_) => 1,
            Cause(_) => 2,
        }
    }
    match (a, b) {
        (Field(x), Field(y)) => x.cmp(y),
        (Cause(x), Cause(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
