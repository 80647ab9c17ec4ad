#![deny(warnings)]

//! Data pipeline: turns daily-resolution trajectory documents into aligned
//! monthly game data.
//!
//! - [`aggregate_to_monthly`] buckets a daily trajectory by calendar month
//! - [`normalize_length`] resamples a series for display alignment
//! - [`build_game_data`] reconciles the primary and secondary trajectories
//! - [`BenchmarkCurves`] exposes rebased benchmark strategies
//! - [`load_game_data`] / [`load_benchmarks`] fetch everything from a
//!   [`DocumentSource`]

mod aggregate;
mod assemble;
mod benchmarks;
mod loader;
mod normalize;
mod raw;
mod source;
pub mod synthetic;

pub use aggregate::{aggregate_to_monthly, MonthlySeries};
pub use assemble::{build_game_data, reconcile_secondary, resolve_tickers};
pub use benchmarks::BenchmarkCurves;
pub use loader::{load_benchmarks, load_game_data, LoadError};
pub use normalize::normalize_length;
pub use raw::{BenchmarkDocument, PrimaryDocument, SecondaryDocument};
pub use source::{DirSource, DocumentSource, FetchError, MemorySource};
