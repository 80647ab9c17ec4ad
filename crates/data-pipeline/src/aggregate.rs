//! Month-end aggregation of daily trajectories.

use arena_core::{month_key, DailyTrajectory, RawReturnRow};
use arena_econ::rebase;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Month-end view of a trajectory, rebased to the starting capital.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    /// Last observed date of each month, ascending.
    pub dates: Vec<String>,
    pub portfolio: Vec<f64>,
    /// Last observed weight vector per month (empty when none was seen).
    pub weights: Vec<Vec<f64>>,
    /// Compounded return per asset over each month.
    pub monthly_returns: Vec<Vec<f64>>,
}

impl MonthlySeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

struct Bucket {
    date: String,
    value: f64,
    weights: Option<Vec<f64>>,
    growth: Vec<f64>,
}

/// A return row counts only when it has one finite value per asset.
fn valid_row(row: Option<&RawReturnRow>, n_assets: usize) -> Option<Vec<f64>> {
    let row = row?.as_ref()?;
    if row.len() != n_assets {
        return None;
    }
    row.iter()
        .map(|r| r.filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()
}

/// Calendar order of a bucket; unparseable dates sort after every real one.
fn sort_key(date: &str) -> (bool, Option<NaiveDate>) {
    let parsed = date
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{}-01", month_key(date)), "%Y-%m-%d").ok());
    (parsed.is_none(), parsed)
}

/// Aggregate a daily trajectory into month-end buckets.
///
/// Later observations within a month win for date, value and weights; asset
/// returns are compounded over every valid row of the month. Missing or
/// malformed entries carry no information for their day. Buckets are
/// emitted in calendar order and the value path is rebased so it starts at
/// `capital` whenever the raw first value is finite and non-zero.
pub fn aggregate_to_monthly(
    label: &str,
    daily: &DailyTrajectory,
    n_assets: usize,
    capital: f64,
) -> MonthlySeries {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut last_value: Option<f64> = None;
    let mut last_weights: Option<&Vec<f64>> = None;

    for (i, date) in daily.dates.iter().enumerate() {
        let value = daily.portfolio_path.get(i).copied().flatten();
        let weights = daily.weights_path.get(i).and_then(Option::as_ref);
        if value.is_some() {
            last_value = value;
        }
        if weights.is_some() {
            last_weights = weights;
        }

        let key = month_key(date);
        let slot = *index.entry(key).or_insert_with(|| {
            buckets.push(Bucket {
                date: date.clone(),
                value: last_value.unwrap_or(capital),
                weights: last_weights.cloned(),
                growth: vec![1.0; n_assets],
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.date = date.clone();
        if let Some(v) = value {
            bucket.value = v;
        }
        if let Some(w) = weights {
            bucket.weights = Some(w.clone());
        }
        if let Some(row) = valid_row(daily.asset_returns.get(i), n_assets) {
            for (g, r) in bucket.growth.iter_mut().zip(row) {
                *g *= 1.0 + r;
            }
        }
    }

    // Insertion order is not trusted; calendar order is.
    buckets.sort_by_cached_key(|b| sort_key(&b.date));

    let mut out = MonthlySeries::default();
    let mut raw_values = Vec::with_capacity(buckets.len());
    for b in buckets {
        out.dates.push(b.date);
        out.weights.push(b.weights.unwrap_or_default());
        out.monthly_returns
            .push(b.growth.iter().map(|g| g - 1.0).collect());
        raw_values.push(b.value);
    }
    out.portfolio = rebase(&raw_values, capital);

    if let (Some(first), Some(last)) = (out.portfolio.first(), out.portfolio.last()) {
        debug!(
            label,
            months = out.dates.len(),
            start = first,
            end = last,
            cum = last / first - 1.0,
            "monthly aggregation"
        );
    }
    out
}
