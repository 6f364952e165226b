//! Normalization, supported-type masking and cause weights.
//!
//! Contract:
//! - `normalize` leaves a split alone when it already sums to 100 (±0.01),
//!   scales it proportionally when the sum is positive, and falls back to
//!   `EQUAL_SPLIT_FALLBACK` otherwise.
//! - `allocation_for_cause` masks unsupported types and normalizes what is
//!   left. When nothing is left but the cause does support some type, the
//!   100% is spread evenly over the supported types so unsupported
//!   components stay exactly 0. A cause that supports nothing gets the
//!   fallback constant.
//! - `compute_weight` is the *un-normalized* supported mass; it decides how
//!   much money a cause receives relative to the others.

use waqf_core::{WaqfType, WaqfTypeSet, WaqfTypeSplit, EQUAL_SPLIT_FALLBACK, SUM_TOLERANCE};

pub fn normalize(split: &WaqfTypeSplit) -> WaqfTypeSplit {
    let sum = split.total();
    if (sum - 100.0).abs() <= SUM_TOLERANCE {
        return *split;
    }
    if sum > 0.0 {
        return WaqfTypeSplit::new(
            split.permanent / sum * 100.0,
            split.temporary_consumable / sum * 100.0,
            split.temporary_revolving / sum * 100.0,
        );
    }
    EQUAL_SPLIT_FALLBACK
}

pub fn allocation_for_cause(global: &WaqfTypeSplit, supported: &WaqfTypeSet) -> WaqfTypeSplit {
    let masked = global.masked(supported);
    if masked.total() > 0.0 || supported.is_empty() {
        return normalize(&masked);
    }
    even_split(supported)
}

pub fn compute_weight(global: &WaqfTypeSplit, supported: &WaqfTypeSet) -> f64 {
    global
        .iter()
        .filter(|(t, _)| supported.contains(t))
        .map(|(_, v)| v)
        .sum()
}

/// 100% spread over `supported`; three supported types yield the fallback literals.
fn even_split(supported: &WaqfTypeSet) -> WaqfTypeSplit {
    match supported.len() {
        0 | 3 => EQUAL_SPLIT_FALLBACK,
        n => {
            let share = 100.0 / n as f64;
            let mut out = WaqfTypeSplit::ZERO;
            for t in WaqfType::ALL.into_iter().filter(|t| supported.contains(t)) {
                out[t] = share;
            }
            out
        }
    }
}
