//! Params for new portfolios, with safe defaults and domain checks.

use crate::errors::CoreError;
use crate::portfolio::ExpirationPreference;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const LOCK_PERIOD_MIN_MONTHS: u32 = 1;
pub const LOCK_PERIOD_MAX_MONTHS: u32 = 120;
pub const DEFAULT_LOCK_PERIOD_MONTHS: u32 = 12;

/// Mode selector without payload (the payload lives in `AllocationMode`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModeKind {
    Simple,
    #[default]
    Balanced,
    Advanced,
}

impl ModeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeKind::Simple => "simple",
            ModeKind::Balanced => "balanced",
            ModeKind::Advanced => "advanced",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Params {
    /// Lock period for temporary waqf principal (1..=120 months).
    pub lock_period_months: u32,
    pub default_expiration_preference: ExpirationPreference,
    pub initial_mode: ModeKind,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            lock_period_months: DEFAULT_LOCK_PERIOD_MONTHS,
            default_expiration_preference: ExpirationPreference::default(),
            initial_mode: ModeKind::default(),
        }
    }
}

pub fn validate_domains(p: &Params) -> Result<(), CoreError> {
    if !(LOCK_PERIOD_MIN_MONTHS..=LOCK_PERIOD_MAX_MONTHS).contains(&p.lock_period_months) {
        return Err(CoreError::DomainOutOfRange("lockPeriodMonths"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_domain() {
        assert_eq!(validate_domains(&Params::default()), Ok(()));
    }

    #[test]
    fn lock_period_bounds() {
        let mut p = Params { lock_period_months: 0, ..Params::default() };
        assert_eq!(validate_domains(&p), Err(CoreError::DomainOutOfRange("lockPeriodMonths")));
        p.lock_period_months = 120;
        assert_eq!(validate_domains(&p), Ok(()));
        p.lock_period_months = 121;
        assert!(validate_domains(&p).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_params_fill_defaults() {
        let p: Params = serde_json::from_str(r#"{"initialMode":"advanced"}"#).unwrap();
        assert_eq!(p.initial_mode, ModeKind::Advanced);
        assert_eq!(p.lock_period_months, DEFAULT_LOCK_PERIOD_MONTHS);
    }
}
