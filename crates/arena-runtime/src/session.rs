use arena_core::{resolve_player_name, validate_game_data, GameConfig, GameData, ValidationError};
use arena_econ::{compound, equal_weight_return, return_since, weighted_return, Allocation, AllocationError};
use data_pipeline::BenchmarkCurves;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Lifecycle of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No game data yet, or loading failed.
    Loading,
    Ready,
    /// The last month has been reached; only restart and slider edits apply.
    Finished,
}

/// Reasons a simulation action was refused. State is never mutated when one
/// of these is returned.
#[derive(Debug, Error, PartialEq)]
pub enum StepError {
    #[error("game data not loaded")]
    NotLoaded,
    #[error("month {step} has {found} returns for {expected} tickers")]
    ReturnRowMismatch {
        step: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Result of a successful [`GameSession::advance`].
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// One month was simulated.
    Advanced {
        step: usize,
        period_return: f64,
        player_value: f64,
    },
    /// Already at the last month; nothing changed.
    Finished,
}

/// One player's game over a fixed monthly data set.
///
/// Owns every piece of mutable simulation state; rankings and chart series
/// are derived from it on demand.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    player_name: String,
    data: Option<GameData>,
    benchmarks: Option<BenchmarkCurves>,
    load_error: Option<String>,
    allocation: Allocation,
    step: usize,
    player_value: f64,
    shadow_single: f64,
    shadow_equal: f64,
    player_path: Vec<f64>,
    phase: Phase,
    closed: bool,
}

impl GameSession {
    pub fn new(config: GameConfig, player_name: Option<&str>) -> Self {
        let capital = config.starting_capital;
        let player_name = resolve_player_name(player_name, &config.default_player_name);
        Self {
            config,
            player_name,
            data: None,
            benchmarks: None,
            load_error: None,
            allocation: Allocation::equal(&[]),
            step: 0,
            player_value: capital,
            shadow_single: capital,
            shadow_equal: capital,
            player_path: vec![capital],
            phase: Phase::Loading,
            closed: false,
        }
    }

    /// Install freshly assembled game data and start at month 0.
    pub fn load(&mut self, data: GameData) -> Result<(), ValidationError> {
        validate_game_data(&data)?;
        self.allocation = Allocation::equal(&data.tickers);
        info!(
            player = %self.player_name,
            months = data.months(),
            tickers = data.tickers.len(),
            "session ready"
        );
        self.data = Some(data);
        self.load_error = None;
        self.reset_values();
        Ok(())
    }

    /// Record a fatal load failure. The session stays in `Loading`.
    pub fn fail_load(&mut self, reason: impl fmt::Display) {
        let message = reason.to_string();
        error!(error = %message, "game data could not be loaded");
        self.load_error = Some(message);
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Attach benchmark curves when their fetch completes. Returns `false`
    /// (and drops them) when the session was already closed.
    pub fn attach_benchmarks(&mut self, benchmarks: Option<BenchmarkCurves>) -> bool {
        if self.closed {
            debug!("session closed, ignoring late benchmarks");
            return false;
        }
        self.benchmarks = benchmarks;
        true
    }

    /// Tear the session down; later benchmark arrivals are ignored.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Simulate the current month with the player's normalized weights.
    pub fn advance(&mut self) -> Result<StepOutcome, StepError> {
        let data = self.data.as_ref().ok_or(StepError::NotLoaded)?;
        let max_step = data.max_step();
        if self.step >= max_step {
            if self.phase != Phase::Finished {
                info!(value = self.player_value, "game finished");
            }
            self.phase = Phase::Finished;
            return Ok(StepOutcome::Finished);
        }

        let row = data
            .asset_returns
            .get(self.step)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let expected = data.tickers.len();
        if row.len() != expected {
            warn!(
                step = self.step,
                expected,
                found = row.len(),
                "return row does not match tickers, step refused"
            );
            return Err(StepError::ReturnRowMismatch {
                step: self.step,
                expected,
                found: row.len(),
            });
        }

        let period_return = weighted_return(&self.allocation.normalized(), row);
        let single_return = data
            .ticker_index(&self.config.shadow_ticker)
            .map(|i| row[i]);
        let equal_return = equal_weight_return(row);

        self.player_value = compound(self.player_value, period_return);
        if let Some(r) = single_return {
            self.shadow_single = compound(self.shadow_single, r);
        }
        self.shadow_equal = compound(self.shadow_equal, equal_return);
        self.step = (self.step + 1).min(max_step);
        self.record_player_value(self.step, self.player_value);
        debug!(
            step = self.step,
            period_return,
            value = self.player_value,
            "month simulated"
        );
        if self.step >= max_step {
            self.phase = Phase::Finished;
            info!(value = self.player_value, "game finished");
        }
        Ok(StepOutcome::Advanced {
            step: self.step,
            period_return,
            player_value: self.player_value,
        })
    }

    /// Back to month 0 with starting capital and an equal split.
    pub fn restart(&mut self) -> Result<(), StepError> {
        if self.data.is_none() {
            return Err(StepError::NotLoaded);
        }
        self.allocation.reset_equal();
        self.reset_values();
        info!("session restarted");
        Ok(())
    }

    /// Move one slider; the others are redistributed to keep the sum at 100.
    pub fn set_allocation(&mut self, ticker: &str, weight: f64) -> Result<(), StepError> {
        if self.phase == Phase::Loading {
            return Err(StepError::NotLoaded);
        }
        self.allocation.set(ticker, weight)?;
        Ok(())
    }

    fn reset_values(&mut self) {
        let capital = self.config.starting_capital;
        self.step = 0;
        self.player_value = capital;
        self.shadow_single = capital;
        self.shadow_equal = capital;
        self.player_path = vec![capital];
        self.phase = if self.data.as_ref().is_some_and(|d| d.max_step() == 0) {
            Phase::Finished
        } else {
            Phase::Ready
        };
    }

    /// Write `value` at `index`, growing the path with the last known value.
    fn record_player_value(&mut self, index: usize, value: f64) {
        let fill = self
            .player_path
            .last()
            .copied()
            .unwrap_or(self.config.starting_capital);
        if self.player_path.len() <= index {
            self.player_path.resize(index + 1, fill);
        }
        self.player_path[index] = value;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn data(&self) -> Option<&GameData> {
        self.data.as_ref()
    }

    pub fn benchmarks(&self) -> Option<&BenchmarkCurves> {
        self.benchmarks.as_ref()
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn max_step(&self) -> usize {
        self.data.as_ref().map_or(0, GameData::max_step)
    }

    /// Months elapsed so far, including the current one.
    pub fn effective_len(&self) -> usize {
        self.data
            .as_ref()
            .map_or(0, |d| (self.step + 1).min(d.months()))
    }

    pub fn player_value(&self) -> f64 {
        self.player_value
    }

    pub fn player_path(&self) -> &[f64] {
        &self.player_path
    }

    /// Single-asset shadow value, `None` if that asset is not tracked.
    pub fn shadow_single(&self) -> Option<f64> {
        self.data
            .as_ref()?
            .ticker_index(&self.config.shadow_ticker)
            .map(|_| self.shadow_single)
    }

    pub fn shadow_equal(&self) -> f64 {
        self.shadow_equal
    }

    pub fn hud(&self) -> Hud {
        let capital = self.config.starting_capital;
        let agent_value = |path: Option<&Vec<f64>>| {
            path.and_then(|p| p.get(self.step.min(p.len().saturating_sub(1))))
                .copied()
                .unwrap_or(capital)
        };
        Hud {
            month: self.step + 1,
            total_months: self.max_step() + 1,
            date: self
                .data
                .as_ref()
                .and_then(|d| d.dates.get(self.step))
                .cloned(),
            player_value: self.player_value,
            player_return: return_since(self.player_value, capital),
            trpo_value: agent_value(self.data.as_ref().map(|d| &d.trpo_portfolio)),
            ppo_value: agent_value(self.data.as_ref().map(|d| &d.ppo_portfolio)),
            shadow_ticker: self.config.shadow_ticker.clone(),
            shadow_single: self.shadow_single(),
            shadow_equal: self.shadow_equal,
            finished: self.phase == Phase::Finished,
        }
    }
}

/// Snapshot of the header numbers shown while playing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Hud {
    /// 1-based month number.
    pub month: usize,
    pub total_months: usize,
    pub date: Option<String>,
    pub player_value: f64,
    pub player_return: f64,
    pub trpo_value: f64,
    pub ppo_value: f64,
    pub shadow_ticker: String,
    pub shadow_single: Option<f64>,
    pub shadow_equal: f64,
    pub finished: bool,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Month {} / {} · {}",
            self.month,
            self.total_months,
            self.date.as_deref().unwrap_or("Game starting...")
        )
    }
}
