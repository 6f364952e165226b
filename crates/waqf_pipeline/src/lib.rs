//! waqf_pipeline: orchestration surface (load → refresh causes → apply request → validate).
//! Delegates JSON/hashing/stores to `waqf_io` and the math to `waqf_algo`; the
//! `run` entry point itself is I/O-free.
//!
//! Every run returns a portfolio *and* a report: validation never blocks
//! computation.

use core::fmt;

use waqf_algo::EngineError;
use waqf_core::{AllocationMode, CauseDirectory, CauseId, Portfolio, WaqfType, WaqfTypeSplit, EQUAL_SPLIT_FALLBACK};

pub mod load;
pub mod validate;

pub use validate::{validate, EntityRef, Severity, ValidationIssue, ValidationReport};

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Io(String),
    Schema(String),
    Validate(String),
    Engine(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Schema(m) => write!(f, "schema: {m}"),
            PipelineError::Validate(m) => write!(f, "validate: {m}"),
            PipelineError::Engine(m) => write!(f, "engine: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<waqf_io::IoError> for PipelineError {
    fn from(e: waqf_io::IoError) -> Self {
        use waqf_io::IoError;
        use PipelineError::*;
        match e {
            IoError::Path(m) => Io(format!("path: {m}")),
            IoError::Json { pointer, msg } => Schema(format!("json {pointer}: {msg}")),
            IoError::Schema { pointer, msg } => Schema(format!("{pointer}: {msg}")),
            IoError::Hash(m) => Schema(format!("hash: {m}")),
            IoError::Invalid(m) => Validate(m),
        }
    }
}

impl From<EngineError> for PipelineError {
    fn from(e: EngineError) -> Self {
        PipelineError::Engine(e.to_string())
    }
}

/// One donor action against the current portfolio.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Re-apply the current mode (after a total or catalog change).
    Recompute,
    Simple { waqf_type: WaqfType },
    Balanced { global: WaqfTypeSplit },
    Advanced,
    SetShare { cause: CauseId, percent: f64 },
    SetCauseAllocation { cause: CauseId, waqf_type: WaqfType, percent: f64 },
    /// Move one balanced-mode slider; the other two absorb the difference.
    AdjustSlider { waqf_type: WaqfType, value: f64 },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Recompute => "recompute",
            Request::Simple { .. } => "simple",
            Request::Balanced { .. } => "balanced",
            Request::Advanced => "advanced",
            Request::SetShare { .. } => "set_share",
            Request::SetCauseAllocation { .. } => "set_cause_allocation",
            Request::AdjustSlider { .. } => "adjust_slider",
        }
    }
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutputs {
    pub portfolio: Portfolio,
    pub report: ValidationReport,
}

// -------------------------------------- Public API --------------------------------------

/// Apply `request` to `portfolio`. When a directory is given, each cause's
/// supported types are refreshed from it first.
pub fn run(
    portfolio: &Portfolio,
    directory: Option<&CauseDirectory>,
    request: Request,
) -> Result<PipelineOutputs, PipelineError> {
    let refreshed = match directory {
        Some(dir) => refresh_causes(portfolio, dir),
        None => portfolio.clone(),
    };

    tracing::debug!(request = request.name(), mode = refreshed.allocation_mode.kind().as_str(), "dispatch");
    let next = apply(&refreshed, request)?;

    let report = validate(&next);
    tracing::info!(
        mode = next.allocation_mode.kind().as_str(),
        items = next.items.len(),
        pass = report.pass,
        issues = report.issues.len(),
        "allocation computed"
    );
    Ok(PipelineOutputs { portfolio: next, report })
}

fn apply(p: &Portfolio, request: Request) -> Result<Portfolio, PipelineError> {
    let out = match request {
        Request::Recompute => waqf_algo::recompute(p),
        Request::Simple { waqf_type } => waqf_algo::apply_simple(p, waqf_type),
        Request::Balanced { global } => waqf_algo::apply_balanced(p, &global),
        Request::Advanced => waqf_algo::apply_advanced(p),
        Request::SetShare { cause, percent } => waqf_algo::set_portfolio_share(p, &cause, percent)?,
        Request::SetCauseAllocation { cause, waqf_type, percent } => {
            waqf_algo::set_cause_allocation(p, &cause, waqf_type, percent)?
        }
        Request::AdjustSlider { waqf_type, value } => {
            let current = match &p.allocation_mode {
                AllocationMode::Balanced { global_allocation } => *global_allocation,
                _ => EQUAL_SPLIT_FALLBACK,
            };
            let global = waqf_algo::adjust_global_slider(&current, waqf_type, value);
            waqf_algo::apply_balanced(p, &global)
        }
    };
    Ok(out)
}

/// Copy of `p` with supported types taken from the directory where it knows the cause.
pub fn refresh_causes(p: &Portfolio, dir: &CauseDirectory) -> Portfolio {
    let mut changed = 0usize;
    let items = p
        .items
        .iter()
        .map(|it| {
            let cause = dir.refresh(&it.cause);
            if cause != it.cause {
                changed += 1;
            }
            waqf_core::PortfolioItem { cause, ..it.clone() }
        })
        .collect();
    if changed > 0 {
        tracing::debug!(changed, "cause support refreshed from directory");
    }
    Portfolio { items, ..p.clone() }
}
