//! LOAD stage: file paths → typed inputs for `run`.
//! - Portfolio file (duplicates dropped with a warning by `waqf_io`).
//! - Optional catalog → `CauseDirectory`.
//! - New portfolios from a cause selection + optional params file.

#![forbid(unsafe_code)]

use std::path::Path;

use waqf_core::{CauseDirectory, Params, Portfolio};
use waqf_io::loader;

use crate::PipelineError;

/// Inputs for one engine call.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub portfolio: Portfolio,
    pub directory: Option<CauseDirectory>,
}

pub fn load_inputs(portfolio: &Path, catalog: Option<&Path>) -> Result<LoadedInputs, PipelineError> {
    let portfolio = loader::load_portfolio_file(portfolio)?;
    let directory = match catalog {
        Some(path) => {
            let dir = loader::load_catalog(path)?;
            tracing::debug!(entries = dir.len(), "catalog loaded");
            Some(dir)
        }
        None => None,
    };
    Ok(LoadedInputs { portfolio, directory })
}

/// Fresh portfolio from a cause selection file, computed in its initial mode.
pub fn new_portfolio(causes: &Path, total_amount: f64, params: Option<&Path>) -> Result<Portfolio, PipelineError> {
    let params = match params {
        Some(path) => loader::load_params(path)?,
        None => Params::default(),
    };
    let causes = loader::load_causes(causes)?;
    let fresh = Portfolio::from_causes(causes, total_amount, &params);
    Ok(waqf_algo::recompute(&fresh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use waqf_core::{AllocationMode, ModeKind};

    #[test]
    fn new_portfolio_respects_params() {
        let dir = tempfile::tempdir().unwrap();
        let causes = dir.path().join("causes.json");
        let params = dir.path().join("params.json");
        std::fs::write(
            &causes,
            r#"[{"id":"a","name":"A","supportedWaqfTypes":["permanent"]},
                {"id":"b","name":"B","supportedWaqfTypes":["temporary_consumable"]}]"#,
        )
        .unwrap();
        std::fs::write(&params, r#"{"initialMode":"advanced","lockPeriodMonths":24}"#).unwrap();

        let p = new_portfolio(&causes, 600.0, Some(&params)).unwrap();
        assert_eq!(p.allocation_mode.kind(), ModeKind::Advanced);
        assert_eq!(p.lock_period_months, 24);
        assert_eq!(p.items[0].total_amount, 300.0);
        assert_eq!(p.portfolio_share(&"b".parse().unwrap()), Some(50.0));
    }

    #[test]
    fn missing_catalog_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let pf = dir.path().join("p.json");
        std::fs::write(&pf, r#"{"items":[],"totalAmount":0}"#).unwrap();
        let ok = load_inputs(&pf, None).unwrap();
        assert!(ok.directory.is_none());
        assert_eq!(ok.portfolio.allocation_mode, AllocationMode::default());

        let err = load_inputs(&pf, Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
