#![deny(warnings)]

//! Core domain models and invariants for the Gold Rush arena.
//!
//! This crate defines the serializable types shared by the data pipeline, the
//! portfolio math and the game runtime, plus validation helpers that guard
//! the shape of the monthly game data.

mod competitor;
mod config;
mod format;
mod groups;

pub use competitor::{Award, CompetitorGroup, CompetitorId, CompetitorInfo};
pub use config::{ConfigError, DocumentNames, GameConfig};
pub use format::{format_money, format_pct};
pub use groups::{asset_groups, AssetGroup};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capital every trajectory is rebased to unless configured otherwise.
pub const STARTING_CAPITAL: f64 = 1_000_000.0;

/// Name shown for the player when none (or a blank one) is supplied.
pub const DEFAULT_PLAYER_NAME: &str = "You";

/// One day of per-asset returns as found in exported documents.
///
/// `None` means the row is absent; `None` entries stand for `null` cells.
pub type RawReturnRow = Option<Vec<Option<f64>>>;

/// Daily-resolution trajectory exactly as exported by an agent run.
///
/// Well-formed sources have one entry per date in every column; consumers
/// tolerate ragged or missing entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyTrajectory {
    /// ISO date strings, ascending.
    pub dates: Vec<String>,
    /// Per-date return vectors, one scalar per tracked asset.
    pub asset_returns: Vec<RawReturnRow>,
    /// Per-date portfolio value.
    pub portfolio_path: Vec<Option<f64>>,
    /// Per-date weight vectors.
    pub weights_path: Vec<Option<Vec<f64>>>,
}

impl DailyTrajectory {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Aligned monthly data driving one game session.
///
/// Rebuilt from the source documents on every load and never mutated by the
/// simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    /// Month-end date strings, ascending.
    pub dates: Vec<String>,
    /// Ordered asset identifiers.
    pub tickers: Vec<String>,
    /// Monthly compounded returns, rows = months, cols = tickers.
    pub asset_returns: Vec<Vec<f64>>,
    /// TRPO agent value path, rebased to the starting capital.
    pub trpo_portfolio: Vec<f64>,
    pub trpo_weights: Vec<Vec<f64>>,
    /// PPO agent value path, rebased to the starting capital.
    pub ppo_portfolio: Vec<f64>,
    pub ppo_weights: Vec<Vec<f64>>,
}

impl GameData {
    /// Number of monthly steps on the time axis.
    pub fn months(&self) -> usize {
        self.dates.len()
    }

    /// Last reachable step index.
    pub fn max_step(&self) -> usize {
        self.dates.len().saturating_sub(1)
    }

    /// Column of `ticker`, matched case-insensitively.
    pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers
            .iter()
            .position(|t| t.eq_ignore_ascii_case(ticker))
    }
}

/// Year-month aggregation key (`YYYY-MM`) of an ISO date string.
///
/// Strings shorter than seven characters are their own key.
pub fn month_key(date: &str) -> &str {
    date.get(..7).unwrap_or(date)
}

/// Player name from a free-text parameter, falling back to `default` when
/// absent or blank.
pub fn resolve_player_name(param: Option<&str>, default: &str) -> String {
    match param.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default.to_string(),
    }
}

/// Validation errors for assembled game data.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// There is no time axis to drive the simulation.
    #[error("game data has no dates")]
    EmptyDateAxis,
    /// A monthly column does not have one entry per date.
    #[error("{series} has {found} entries, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        found: usize,
    },
    /// A value path contains NaN or infinity.
    #[error("{0} contains a non-finite value")]
    NonFinite(&'static str),
}

/// Validate the shape of monthly game data.
///
/// Return rows of the wrong width are not rejected here: they are refused
/// one step at a time by the runtime.
pub fn validate_game_data(data: &GameData) -> Result<(), ValidationError> {
    let months = data.dates.len();
    if months == 0 {
        return Err(ValidationError::EmptyDateAxis);
    }
    let columns: [(&'static str, usize); 3] = [
        ("assetReturns", data.asset_returns.len()),
        ("trpoPortfolio", data.trpo_portfolio.len()),
        ("ppoPortfolio", data.ppo_portfolio.len()),
    ];
    for (series, found) in columns {
        if found != months {
            return Err(ValidationError::LengthMismatch {
                series,
                expected: months,
                found,
            });
        }
    }
    if data.trpo_portfolio.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFinite("trpoPortfolio"));
    }
    if data.ppo_portfolio.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFinite("ppoPortfolio"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_months() -> GameData {
        GameData {
            dates: vec![
                "2020-01-31".to_string(),
                "2020-02-28".to_string(),
                "2020-03-31".to_string(),
            ],
            tickers: vec!["SPY".to_string(), "TLT".to_string()],
            asset_returns: vec![vec![0.1, -0.05], vec![0.0, 0.2], vec![0.05, 0.05]],
            trpo_portfolio: vec![STARTING_CAPITAL, 1_010_000.0, 1_020_000.0],
            trpo_weights: vec![vec![0.5, 0.5]; 3],
            ppo_portfolio: vec![STARTING_CAPITAL; 3],
            ppo_weights: vec![vec![]; 3],
        }
    }

    #[test]
    fn valid_data_passes() {
        let data = three_months();
        validate_game_data(&data).unwrap();
        assert_eq!(data.months(), 3);
        assert_eq!(data.max_step(), 2);
    }

    #[test]
    fn empty_axis_is_rejected() {
        let data = GameData::default();
        assert_eq!(
            validate_game_data(&data),
            Err(ValidationError::EmptyDateAxis)
        );
        assert_eq!(data.max_step(), 0);
    }

    #[test]
    fn short_agent_path_is_rejected() {
        let mut data = three_months();
        data.ppo_portfolio.pop();
        assert_eq!(
            validate_game_data(&data),
            Err(ValidationError::LengthMismatch {
                series: "ppoPortfolio",
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let mut data = three_months();
        data.trpo_portfolio[1] = f64::NAN;
        assert_eq!(
            validate_game_data(&data),
            Err(ValidationError::NonFinite("trpoPortfolio"))
        );
    }

    #[test]
    fn ticker_lookup_ignores_case() {
        let data = three_months();
        assert_eq!(data.ticker_index("spy"), Some(0));
        assert_eq!(data.ticker_index("TLT"), Some(1));
        assert_eq!(data.ticker_index("GLD"), None);
    }

    #[test]
    fn month_key_takes_year_month() {
        assert_eq!(month_key("2021-07-15"), "2021-07");
        assert_eq!(month_key("2021-07-15T00:00:00Z"), "2021-07");
        assert_eq!(month_key("2021"), "2021");
    }

    #[test]
    fn player_name_falls_back_when_blank() {
        assert_eq!(resolve_player_name(None, DEFAULT_PLAYER_NAME), "You");
        assert_eq!(resolve_player_name(Some("   "), DEFAULT_PLAYER_NAME), "You");
        assert_eq!(resolve_player_name(Some(" Ada "), DEFAULT_PLAYER_NAME), "Ada");
    }

    #[test]
    fn game_data_uses_camel_case_on_the_wire() {
        let s = serde_json::to_string(&three_months()).unwrap();
        assert!(s.contains("\"assetReturns\""));
        assert!(s.contains("\"trpoPortfolio\""));
        let back: GameData = serde_json::from_str(&s).unwrap();
        assert_eq!(back.tickers, vec!["SPY", "TLT"]);
    }

    #[test]
    fn daily_trajectory_accepts_nulls() {
        let json = r#"{
            "dates": ["2020-01-02", "2020-01-03"],
            "assetReturns": [[0.01, null], null],
            "portfolioPath": [100.0, null],
            "weightsPath": [null, [0.5, 0.5]]
        }"#;
        let t: DailyTrajectory = serde_json::from_str(json).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.asset_returns[0], Some(vec![Some(0.01), None]));
        assert_eq!(t.asset_returns[1], None);
        assert_eq!(t.portfolio_path, vec![Some(100.0), None]);
    }

    proptest! {
        #[test]
        fn month_key_is_a_prefix(y in 1990u32..2100, m in 1u32..=12, d in 1u32..=28) {
            let date = format!("{y:04}-{m:02}-{d:02}");
            let key = month_key(&date);
            prop_assert!(date.starts_with(key));
            prop_assert_eq!(key.len(), 7);
        }
    }
}
