//! Balanced-mode global slider rebalance.
//!
//! 1. Clamp the new value to [0, 100] and write it to `changed`.
//! 2. If the split already sums to 100 (±0.01) stop.
//! 3. Spread the difference equally over the two other types, clamping each.
//! 4. If clamping swallowed part of the adjustment, put the residual on the
//!    larger of the two other types (tie → first in enumeration order).

use waqf_core::{WaqfType, WaqfTypeSplit, SUM_TOLERANCE};

#[inline]
fn clamp_pct(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

pub fn adjust_global_slider(current: &WaqfTypeSplit, changed: WaqfType, new_value: f64) -> WaqfTypeSplit {
    let mut next = *current;
    next[changed] = clamp_pct(new_value);

    let diff = 100.0 - next.total();
    if diff.abs() <= SUM_TOLERANCE {
        return next;
    }

    let [a, b] = changed.others();
    let half = diff / 2.0;
    next[a] = clamp_pct(next[a] + half);
    next[b] = clamp_pct(next[b] + half);

    let residual = 100.0 - next.total();
    if residual.abs() > SUM_TOLERANCE {
        let target = if next[b] > next[a] { b } else { a };
        next[target] += residual;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use WaqfType::*;

    fn split(p: f64, c: f64, r: f64) -> WaqfTypeSplit {
        WaqfTypeSplit::new(p, c, r)
    }

    #[test]
    fn spreads_difference_evenly() {
        assert_eq!(adjust_global_slider(&split(40.0, 30.0, 30.0), Permanent, 70.0), split(70.0, 15.0, 15.0));
    }

    #[test]
    fn clamps_to_zero_without_residual() {
        assert_eq!(adjust_global_slider(&split(90.0, 5.0, 5.0), Permanent, 100.0), split(100.0, 0.0, 0.0));
    }

    #[test]
    fn residual_goes_to_larger_other() {
        // diff -40 → each -20 → 28 and 0 (clamped from -18); residual -18 lands on 28.
        let out = adjust_global_slider(&split(50.0, 48.0, 2.0), Permanent, 90.0);
        assert!((out.permanent - 90.0).abs() < 1e-9);
        assert!((out.temporary_consumable - 10.0).abs() < 1e-9);
        assert_eq!(out.temporary_revolving, 0.0);
    }

    #[test]
    fn residual_tie_prefers_enumeration_order() {
        // Non-finite others collapse to 0 and tie; the residual lands on the first one.
        let out = adjust_global_slider(&split(30.0, f64::NAN, f64::NAN), Permanent, 30.0);
        assert_eq!(out, split(30.0, 70.0, 0.0));

        let out = adjust_global_slider(&split(f64::NAN, 50.0, f64::NAN), TemporaryConsumable, 20.0);
        assert_eq!(out, split(80.0, 20.0, 0.0));
    }

    #[test]
    fn out_of_range_and_nan_are_clamped() {
        let out = adjust_global_slider(&split(40.0, 30.0, 30.0), TemporaryRevolving, 250.0);
        assert_eq!(out, split(0.0, 0.0, 100.0));
        let out = adjust_global_slider(&split(40.0, 30.0, 30.0), TemporaryRevolving, f64::NAN);
        assert_eq!(out, split(55.0, 45.0, 0.0));
    }

    #[test]
    fn near_100_is_returned_as_is() {
        let out = adjust_global_slider(&split(40.0, 30.0, 30.0), Permanent, 40.005);
        assert_eq!(out, split(40.005, 30.0, 30.0));
    }
}
