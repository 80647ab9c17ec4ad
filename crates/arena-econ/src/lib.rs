#![deny(warnings)]

//! Portfolio arithmetic for the arena.
//!
//! This crate provides validated utilities for:
//! - Player slider allocations that always re-sum to 100
//! - Weighted and equal-weight period returns
//! - Rebasing value paths onto a common starting capital

mod allocation;

pub use allocation::{Allocation, AllocationError, FULL_ALLOCATION};

/// Dot product of portfolio weights and one period's asset returns.
///
/// Extra entries on either side are ignored.
///
/// Example:
/// let r = weighted_return(&[0.5, 0.5], &[0.1, -0.05]);
/// assert!((r - 0.025).abs() < 1e-12);
pub fn weighted_return(weights: &[f64], returns: &[f64]) -> f64 {
    weights.iter().zip(returns).map(|(w, r)| w * r).sum()
}

/// Return of an equal-weight portfolio across every asset in `returns`.
/// Zero for an empty row.
pub fn equal_weight_return(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let w = 1.0 / returns.len() as f64;
    returns.iter().map(|r| w * r).sum()
}

/// Apply one period's return to a value.
pub fn compound(value: f64, period_return: f64) -> f64 {
    value * (1.0 + period_return)
}

/// Simple return of `value` relative to `start`; NaN when `start` is zero
/// or not finite.
pub fn return_since(value: f64, start: f64) -> f64 {
    if start == 0.0 || !start.is_finite() {
        return f64::NAN;
    }
    value / start - 1.0
}

/// Factor that maps `first` onto `capital`, or 1 when `first` is zero or
/// not finite (the path is then left in its native units).
pub fn rebase_factor(first: f64, capital: f64) -> f64 {
    if first.is_finite() && first != 0.0 {
        capital / first
    } else {
        1.0
    }
}

/// Scale a whole value path so its first element equals `capital`.
pub fn rebase(values: &[f64], capital: f64) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let scale = rebase_factor(first, capital);
    values.iter().map(|v| v * scale).collect()
}
