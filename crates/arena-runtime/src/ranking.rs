//! Standings across the player, the agents and the benchmark strategies.

use crate::session::GameSession;
use arena_core::{Award, CompetitorGroup, CompetitorId};
use arena_econ::return_since;
use data_pipeline::normalize_length;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Where a competitor's value path comes from.
struct ValueSource {
    id: CompetitorId,
    path: fn(&GameSession) -> Option<&[f64]>,
}

fn player_path(s: &GameSession) -> Option<&[f64]> {
    Some(s.player_path())
}

fn trpo_path(s: &GameSession) -> Option<&[f64]> {
    s.data().map(|d| d.trpo_portfolio.as_slice())
}

fn ppo_path(s: &GameSession) -> Option<&[f64]> {
    s.data().map(|d| d.ppo_portfolio.as_slice())
}

macro_rules! benchmark_path {
    ($name:ident, $id:expr) => {
        fn $name(s: &GameSession) -> Option<&[f64]> {
            s.benchmarks()?.curve($id)
        }
    };
}

benchmark_path!(equal_weight_path, CompetitorId::EqualWeightBh);
benchmark_path!(spy_path, CompetitorId::BuyHoldSpy);
benchmark_path!(cvar_path, CompetitorId::CvarMin);
benchmark_path!(risk_parity_path, CompetitorId::RiskParity);
benchmark_path!(mvo_path, CompetitorId::MvoMaxSharpe);

/// Every competitor in ranking insertion order.
const REGISTRY: [ValueSource; 8] = [
    ValueSource { id: CompetitorId::Player, path: player_path },
    ValueSource { id: CompetitorId::TrpoAgent, path: trpo_path },
    ValueSource { id: CompetitorId::PpoAgent, path: ppo_path },
    ValueSource { id: CompetitorId::EqualWeightBh, path: equal_weight_path },
    ValueSource { id: CompetitorId::BuyHoldSpy, path: spy_path },
    ValueSource { id: CompetitorId::CvarMin, path: cvar_path },
    ValueSource { id: CompetitorId::RiskParity, path: risk_parity_path },
    ValueSource { id: CompetitorId::MvoMaxSharpe, path: mvo_path },
];

/// Value of a path at `step`, clamped to its last point.
fn value_at(path: &[f64], step: usize) -> Option<f64> {
    path.get(step.min(path.len().checked_sub(1)?)).copied()
}

/// One line of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandingRow {
    pub id: CompetitorId,
    pub label: String,
    pub value: f64,
    pub return_since_start: f64,
    pub color: &'static str,
    pub award: Option<Award>,
    /// Set on the player's own row.
    pub highlight: bool,
}

impl StandingRow {
    pub fn group(&self) -> CompetitorGroup {
        self.id.info().group
    }
}

/// Competitors sorted by current value, best first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Standings {
    rows: Vec<StandingRow>,
    player_rank: Option<usize>,
}

impl Standings {
    /// Rank everything available at the session's current step.
    ///
    /// Equal values keep registry order, so the first-inserted competitor
    /// takes the higher place.
    pub fn compute(session: &GameSession) -> Self {
        let Some(data) = session.data() else {
            return Self::default();
        };
        let step = session.step();
        let capital = session.config().starting_capital;
        let last_month = data.max_step();
        let mut rows: Vec<StandingRow> = REGISTRY
            .iter()
            .filter_map(|src| {
                let value = match src.id {
                    CompetitorId::Player => session.player_value(),
                    id if id.is_benchmark() => {
                        value_at((src.path)(session)?, step.min(last_month))?
                    }
                    _ => value_at((src.path)(session)?, step)?,
                };
                let start = match src.id.info().group {
                    CompetitorGroup::Agents => (src.path)(session)
                        .and_then(|p| p.first().copied())
                        .unwrap_or(capital),
                    _ => capital,
                };
                Some(StandingRow {
                    id: src.id,
                    label: src.id.display_name(session.player_name()).to_string(),
                    value,
                    return_since_start: return_since(value, start),
                    color: src.id.info().color,
                    award: None,
                    highlight: src.id == CompetitorId::Player,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        for (rank, row) in rows.iter_mut().enumerate() {
            row.award = Award::for_rank(rank);
        }
        let player_rank = rows.iter().position(|r| r.id == CompetitorId::Player);
        Self { rows, player_rank }
    }

    /// All rows, best first.
    pub fn rows(&self) -> &[StandingRow] {
        &self.rows
    }

    pub fn top(&self, n: usize) -> &[StandingRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn winner(&self) -> Option<&StandingRow> {
        self.rows.first()
    }

    /// 0-based rank of the player.
    pub fn player_rank(&self) -> Option<usize> {
        self.player_rank
    }

    pub fn award_for(&self, id: CompetitorId) -> Option<Award> {
        self.rows.iter().find(|r| r.id == id).and_then(|r| r.award)
    }

    /// Rows of one section in registry order, for grouped display.
    pub fn group(&self, group: CompetitorGroup) -> Vec<&StandingRow> {
        let mut rows: Vec<&StandingRow> =
            self.rows.iter().filter(|r| r.group() == group).collect();
        rows.sort_by_key(|r| r.id);
        rows
    }

    pub fn narrative(&self) -> Narrative {
        let winner = self
            .winner()
            .map_or_else(|| "Top strategy".to_string(), |r| r.label.clone());
        match self.player_rank {
            Some(0) => Narrative::Won,
            Some(1) => Narrative::Second { winner },
            Some(2) => Narrative::Third { winner },
            Some(rank) => Narrative::Placed { winner, rank },
            None => Narrative::Unranked,
        }
    }
}

/// End-of-game message for the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Narrative {
    Won,
    Second { winner: String },
    Third { winner: String },
    /// `rank` is 0-based.
    Placed { winner: String, rank: usize },
    Unranked,
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narrative::Won => {
                write!(f, "You won. Gold. You beat every agent and benchmark this run.")
            }
            Narrative::Second { winner } => write!(
                f,
                "{winner} won this run. You took Silver with one strategy ahead of you."
            ),
            Narrative::Third { winner } => write!(
                f,
                "{winner} won this run. You took Bronze with two strategies ahead of you."
            ),
            Narrative::Placed { winner, rank } => {
                write!(f, "{winner} won this run. You finished #{}.", rank + 1)
            }
            Narrative::Unranked => write!(
                f,
                "Game over. Some benchmarks were not available, so we could not rank you."
            ),
        }
    }
}

/// A competitor's value path resampled to the months played so far.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrategySeries {
    pub id: CompetitorId,
    pub label: String,
    pub color: &'static str,
    pub values: Vec<f64>,
}

/// The top `n` of `standings`, each resampled to the session's elapsed
/// length so they share one time axis.
pub fn top_series(session: &GameSession, standings: &Standings, n: usize) -> Vec<StrategySeries> {
    let len = session.effective_len();
    if len == 0 {
        return Vec::new();
    }
    standings
        .top(n)
        .iter()
        .filter_map(|row| {
            let src = REGISTRY.iter().find(|s| s.id == row.id)?;
            let path = (src.path)(session)?;
            // Full-length paths are squeezed onto the months played so far.
            let values = normalize_length(path, len);
            if values.is_empty() {
                return None;
            }
            Some(StrategySeries {
                id: row.id,
                label: row.label.clone(),
                color: row.color,
                values,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{GameConfig, GameData};
    use data_pipeline::{BenchmarkCurves, BenchmarkDocument};

    const CAPITAL: f64 = 1_000_000.0;

    fn data() -> GameData {
        GameData {
            dates: vec!["2020-01-31".into(), "2020-02-29".into(), "2020-03-31".into()],
            tickers: vec!["SPY".into(), "TLT".into()],
            asset_returns: vec![vec![0.1, -0.05], vec![0.0, 0.2], vec![0.05, 0.05]],
            trpo_portfolio: vec![CAPITAL, 1_200_000.0, 1_300_000.0],
            trpo_weights: vec![vec![0.5, 0.5]; 3],
            ppo_portfolio: vec![CAPITAL, 900_000.0, 950_000.0],
            ppo_weights: vec![vec![0.0, 0.0]; 3],
        }
    }

    fn benchmarks(json: &str) -> Option<BenchmarkCurves> {
        let doc = BenchmarkDocument::from_slice(json.as_bytes()).unwrap();
        Some(BenchmarkCurves::from_document(&doc, CAPITAL))
    }

    fn session(name: Option<&str>) -> GameSession {
        let mut s = GameSession::new(GameConfig::default(), name);
        s.load(data()).unwrap();
        s
    }

    #[test]
    fn missing_benchmark_is_excluded() {
        let mut s = session(None);
        s.attach_benchmarks(benchmarks(
            r#"{ "curves": { "BuyHoldSPY": [1.0, 1.05, 1.2], "EqualWeightBH": [1.0, 1.0, 1.0],
                 "RiskParityInvVol": [1.0, 1.01, 1.02], "MVO_MaxSharpe": [1.0, 1.5, 1.6] } }"#,
        ));
        s.advance().unwrap();
        let st = Standings::compute(&s);
        assert_eq!(st.rows().len(), 7);
        assert!(st.rows().iter().all(|r| r.id != CompetitorId::CvarMin));
        assert_eq!(st.award_for(CompetitorId::CvarMin), None);
        let top = top_series(&s, &st, 3);
        assert!(top.iter().all(|t| t.id != CompetitorId::CvarMin));
    }

    #[test]
    fn sorted_with_awards() {
        let mut s = session(Some("Ada"));
        s.advance().unwrap();
        let st = Standings::compute(&s);
        let ids: Vec<CompetitorId> = st.rows().iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![CompetitorId::TrpoAgent, CompetitorId::Player, CompetitorId::PpoAgent]
        );
        assert_eq!(st.award_for(CompetitorId::TrpoAgent), Some(Award::Gold));
        assert_eq!(st.award_for(CompetitorId::Player), Some(Award::Silver));
        assert_eq!(st.award_for(CompetitorId::PpoAgent), Some(Award::Bronze));
        assert_eq!(st.player_rank(), Some(1));
        let me = &st.rows()[1];
        assert_eq!(me.label, "Ada");
        assert!(me.highlight);
        assert!((me.return_since_start - 0.025).abs() < 1e-9);
        assert_eq!(
            st.narrative().to_string(),
            "TRPO Agent won this run. You took Silver with one strategy ahead of you."
        );
    }

    #[test]
    fn ties_keep_registry_order() {
        let s = session(None);
        let st = Standings::compute(&s);
        // Everyone starts at the same capital.
        assert_eq!(st.winner().map(|r| r.id), Some(CompetitorId::Player));
        assert_eq!(st.narrative(), Narrative::Won);
    }

    #[test]
    fn benchmarks_clamp_to_last_month() {
        let mut s = session(None);
        s.attach_benchmarks(benchmarks(r#"{ "CVaR_Min": [1.0, 3.0] }"#));
        s.advance().unwrap();
        s.advance().unwrap();
        let st = Standings::compute(&s);
        assert_eq!(st.winner().map(|r| r.id), Some(CompetitorId::CvarMin));
        assert_eq!(st.winner().map(|r| r.value), Some(3_000_000.0));
        assert_eq!(st.player_rank(), Some(2));
        assert_eq!(
            st.narrative().to_string(),
            "CVaR Min won this run. You took Bronze with two strategies ahead of you."
        );
    }

    #[test]
    fn groups_follow_registry_order() {
        let mut s = session(None);
        s.attach_benchmarks(benchmarks(r#"{ "MVO_MaxSharpe": [1.0, 2.0], "BuyHoldSPY": [1.0, 0.5] }"#));
        s.advance().unwrap();
        let st = Standings::compute(&s);
        let benches: Vec<CompetitorId> =
            st.group(CompetitorGroup::Benchmarks).iter().map(|r| r.id).collect();
        assert_eq!(benches, vec![CompetitorId::BuyHoldSpy, CompetitorId::MvoMaxSharpe]);
        let agents = st.group(CompetitorGroup::Agents);
        assert_eq!(agents.len(), 2);
        assert!((agents[0].return_since_start - 0.2).abs() < 1e-9);
    }

    #[test]
    fn narrative_texts() {
        assert_eq!(
            Narrative::Placed {
                winner: "PPO Agent".into(),
                rank: 4
            }
            .to_string(),
            "PPO Agent won this run. You finished #5."
        );
        assert!(Narrative::Unranked.to_string().starts_with("Game over."));
        assert!(Standings::default().narrative() == Narrative::Unranked);
    }

    #[test]
    fn series_match_elapsed_months() {
        let mut s = session(None);
        s.advance().unwrap();
        let st = Standings::compute(&s);
        let top = top_series(&s, &st, 3);
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|t| t.values.len() == 2));
        assert_eq!(top[0].id, CompetitorId::TrpoAgent);
        assert_eq!(top[0].values, vec![CAPITAL, 1_300_000.0]);
        assert_eq!(top[1].values, vec![CAPITAL, s.player_value()]);
    }

    #[test]
    fn full_length_paths_are_resampled() {
        let mut s = session(None);
        s.attach_benchmarks(benchmarks(
            r#"{ "MVO_MaxSharpe": [1.0, 1.5, 2.0, 2.5, 3.0] }"#,
        ));
        s.advance().unwrap();
        let st = Standings::compute(&s);
        let top = top_series(&s, &st, 3);
        let mvo = top
            .iter()
            .find(|t| t.id == CompetitorId::MvoMaxSharpe)
            .unwrap();
        // Five points onto two keeps both endpoints.
        assert_eq!(mvo.values, vec![CAPITAL, 3_000_000.0]);
        assert!(top.iter().all(|t| t.values.len() == s.effective_len()));
    }

    #[test]
    fn nothing_to_rank_before_load() {
        let s = GameSession::new(GameConfig::default(), None);
        assert!(Standings::compute(&s).rows().is_empty());
        assert!(top_series(&s, &Standings::default(), 3).is_empty());
    }
}
