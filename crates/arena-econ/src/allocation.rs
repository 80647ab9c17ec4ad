use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Sum every slider set re-sums to after an edit.
pub const FULL_ALLOCATION: f64 = 100.0;

/// Errors produced when editing an allocation.
#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),
    #[error("weight must be finite, got {0}")]
    NonFinite(f64),
}

/// Player slider state: one raw weight in `[0, 100]` per tracked ticker.
///
/// Every edit redistributes the other sliders so the set sums to 100 and no
/// weight is negative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    tickers: Vec<String>,
    weights: Vec<f64>,
}

impl Allocation {
    /// Equal split across `tickers`.
    pub fn equal(tickers: &[String]) -> Self {
        let mut a = Self {
            tickers: tickers.to_vec(),
            weights: Vec::new(),
        };
        a.reset_equal();
        a
    }

    pub fn reset_equal(&mut self) {
        let n = self.tickers.len().max(1) as f64;
        self.weights = vec![FULL_ALLOCATION / n; self.tickers.len()];
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.index_of(ticker).map(|i| self.weights[i])
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    fn index_of(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Set one slider and redistribute the rest.
    ///
    /// The others keep their previous relative shares of the remainder; if
    /// they previously held nothing, the remainder is split equally.
    pub fn set(&mut self, ticker: &str, new_weight: f64) -> Result<(), AllocationError> {
        if !new_weight.is_finite() {
            return Err(AllocationError::NonFinite(new_weight));
        }
        let idx = self
            .index_of(ticker)
            .ok_or_else(|| AllocationError::UnknownTicker(ticker.to_string()))?;
        let others = self.tickers.len() - 1;
        if others == 0 {
            self.weights[idx] = FULL_ALLOCATION;
            return Ok(());
        }
        let new_weight = new_weight.clamp(0.0, FULL_ALLOCATION);
        let remaining = FULL_ALLOCATION - new_weight;
        let prev_others: f64 = self
            .weights
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, w)| w.max(0.0))
            .sum();
        for (i, w) in self.weights.iter_mut().enumerate() {
            if i == idx {
                *w = new_weight;
            } else if prev_others <= 0.0 {
                *w = remaining / others as f64;
            } else {
                *w = remaining * (w.max(0.0) / prev_others);
            }
        }
        debug!(ticker, weight = new_weight, "allocation updated");
        Ok(())
    }

    /// Weights as fractions summing to 1 (all zero if nothing is allocated).
    pub fn normalized(&self) -> Vec<f64> {
        let clipped: Vec<f64> = self.weights.iter().map(|w| w.max(0.0)).collect();
        let sum: f64 = clipped.iter().sum();
        let sum = if sum > 0.0 { sum } else { 1.0 };
        clipped.into_iter().map(|w| w / sum).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tickers(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn equal_start_sums_to_full() {
        let a = Allocation::equal(&tickers(&["SPY", "TLT", "GLD", "BTC-USD"]));
        assert_eq!(a.weights(), &[25.0, 25.0, 25.0, 25.0]);
        assert!((a.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn pushing_one_slider_moves_the_only_other() {
        let mut a = Allocation::equal(&tickers(&["SPY", "TLT"]));
        a.set("SPY", 80.0).unwrap();
        assert_eq!(a.get("SPY"), Some(80.0));
        assert!((a.get("TLT").unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn others_keep_relative_shares() {
        let mut a = Allocation::equal(&tickers(&["A", "B", "C"]));
        a.set("A", 40.0).unwrap(); // B, C = 30, 30
        a.set("B", 45.0).unwrap(); // A:C was 40:30 of 55
        assert!((a.get("A").unwrap() - 55.0 * 40.0 / 70.0).abs() < 1e-9);
        assert!((a.get("C").unwrap() - 55.0 * 30.0 / 70.0).abs() < 1e-9);
        assert!((a.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_others_split_equally() {
        let mut a = Allocation::equal(&tickers(&["A", "B", "C"]));
        a.set("A", 100.0).unwrap();
        assert_eq!(a.get("B"), Some(0.0));
        a.set("A", 40.0).unwrap();
        assert!((a.get("B").unwrap() - 30.0).abs() < 1e-9);
        assert!((a.get("C").unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn single_ticker_holds_everything() {
        let mut a = Allocation::equal(&tickers(&["SPY"]));
        a.set("SPY", 30.0).unwrap();
        assert_eq!(a.weights(), &[100.0]);
    }

    #[test]
    fn rejects_unknown_and_non_finite() {
        let mut a = Allocation::equal(&tickers(&["SPY", "TLT"]));
        assert_eq!(
            a.set("QQQ", 10.0),
            Err(AllocationError::UnknownTicker("QQQ".into()))
        );
        assert!(matches!(
            a.set("SPY", f64::NAN),
            Err(AllocationError::NonFinite(_))
        ));
        assert_eq!(a.weights(), &[50.0, 50.0]);
    }

    #[test]
    fn normalized_sums_to_one() {
        let mut a = Allocation::equal(&tickers(&["A", "B"]));
        a.set("A", 75.0).unwrap();
        let n = a.normalized();
        assert!((n[0] - 0.75).abs() < 1e-12);
        assert!((n[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let mut a = Allocation::equal(&tickers(&["A", "B"]));
        a.set("A", 150.0).unwrap();
        assert_eq!(a.weights(), &[100.0, 0.0]);
        a.set("A", -5.0).unwrap();
        assert_eq!(a.weights(), &[0.0, 100.0]);
    }

    proptest! {
        #[test]
        fn edits_preserve_total(n in 2usize..8,
                                edits in prop::collection::vec((0usize..8, 0.0f64..=100.0), 1..40)) {
            let names: Vec<String> = (0..n).map(|i| format!("T{i}")).collect();
            let mut a = Allocation::equal(&names);
            for (i, w) in edits {
                a.set(&names[i % n], w).unwrap();
                prop_assert!((a.total() - 100.0).abs() < 1e-6);
                prop_assert!(a.weights().iter().all(|w| *w >= 0.0));
            }
        }
    }
}
