//! Minimal error set for core-domain validation, parsing and workflow checks.

use core::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CoreError {
    InvalidToken,
    InvalidWaqfType,
    DomainOutOfRange(&'static str),
    /// Actor lacks the permission required for the workflow step.
    Unauthorized(&'static str),
    RequestNotPending,
    /// Reviewer is the same account that proposed the request.
    SelfReview,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidToken => write!(f, "invalid token"),
            CoreError::InvalidWaqfType => write!(f, "invalid waqf type"),
            CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            CoreError::Unauthorized(p) => write!(f, "missing permission: {p}"),
            CoreError::RequestNotPending => write!(f, "request is not pending"),
            CoreError::SelfReview => write!(f, "proposer cannot review their own request"),
        }
    }
}

impl std::error::Error for CoreError {}
