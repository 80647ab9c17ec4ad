#![deny(warnings)]

//! Game runtime: the month-by-month simulation state machine, standings and
//! the top-strategies chart.

mod chart;
mod ranking;
mod session;

pub use chart::{build_chart, render_svg, ChartLine, ChartModel};
pub use ranking::{top_series, Narrative, StandingRow, Standings, StrategySeries};
pub use session::{GameSession, Hud, Phase, StepError, StepOutcome};
