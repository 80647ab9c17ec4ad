//! Assembly of monthly game data from the raw trajectory documents.

use crate::aggregate::aggregate_to_monthly;
use crate::loader::LoadError;
use crate::raw::{PrimaryDocument, SecondaryDocument};
use arena_core::{month_key, validate_game_data, GameData};
use arena_econ::rebase_factor;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Asset identifiers for the session.
///
/// The first non-empty explicit list wins (primary before secondary); with
/// no list, `Asset 1..N` is synthesized from the width of the first return
/// row.
pub fn resolve_tickers(primary: &PrimaryDocument, secondary: Option<&SecondaryDocument>) -> Vec<String> {
    let explicit = [
        Some(&primary.tickers),
        Some(&primary.asset_tickers),
        secondary.map(|s| &s.tickers),
        secondary.map(|s| &s.asset_tickers),
    ];
    if let Some(list) = explicit.into_iter().flatten().find(|l| !l.is_empty()) {
        return list.clone();
    }
    let width = primary
        .asset_returns
        .first()
        .and_then(|r| r.as_ref())
        .or_else(|| {
            secondary
                .and_then(|s| s.asset_returns.first())
                .and_then(|r| r.as_ref())
        })
        .map_or(0, Vec::len);
    (1..=width).map(|i| format!("Asset {i}")).collect()
}

/// Map the secondary trajectory onto the primary's monthly dates.
///
/// Months missing from the secondary are forward-filled; months before its
/// first known value sit at `capital`. An unusable or absent secondary
/// becomes a flat line with zero weights.
pub fn reconcile_secondary(
    secondary: Option<&SecondaryDocument>,
    months: &[String],
    n_assets: usize,
    capital: f64,
) -> (Vec<f64>, Vec<Vec<f64>>) {
    let Some(doc) = secondary.filter(|s| s.is_usable()) else {
        warn!("secondary trajectory missing or invalid, using flat line");
        return (
            vec![capital; months.len()],
            vec![vec![0.0; n_assets]; months.len()],
        );
    };

    let mut by_month: HashMap<&str, f64> = HashMap::new();
    for (date, value) in doc.dates.iter().zip(doc.portfolio()) {
        if let Some(v) = value {
            by_month.insert(month_key(date), *v);
        }
    }

    let scale = months
        .first()
        .and_then(|d| by_month.get(month_key(d)))
        .map_or(1.0, |first| rebase_factor(*first, capital));

    let mut values: Vec<f64> = Vec::with_capacity(months.len());
    for d in months {
        let next = match by_month.get(month_key(d)) {
            Some(raw) => raw * scale,
            None => values.last().copied().unwrap_or(capital),
        };
        values.push(next);
    }
    if let (Some(first), Some(last)) = (values.first(), values.last()) {
        debug!(start = first, end = last, cum = last / first - 1.0, "secondary monthly path");
    }
    (values, vec![Vec::new(); months.len()])
}

/// Build validated game data from the primary and optional secondary
/// documents. A primary without dates is fatal: there is no time axis.
pub fn build_game_data(
    primary: &PrimaryDocument,
    secondary: Option<&SecondaryDocument>,
    capital: f64,
) -> Result<GameData, LoadError> {
    if primary.dates.is_empty() {
        return Err(LoadError::NoDateAxis);
    }
    let tickers = resolve_tickers(primary, secondary);
    let monthly = aggregate_to_monthly("TRPO", &primary.to_trajectory(), tickers.len(), capital);
    let (ppo_portfolio, ppo_weights) =
        reconcile_secondary(secondary, &monthly.dates, tickers.len(), capital);

    let data = GameData {
        dates: monthly.dates,
        tickers,
        asset_returns: monthly.monthly_returns,
        trpo_portfolio: monthly.portfolio,
        trpo_weights: monthly.weights,
        ppo_portfolio,
        ppo_weights,
    };
    validate_game_data(&data)?;
    Ok(data)
}
