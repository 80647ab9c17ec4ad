//! Session-start loading of the trajectory and benchmark documents.

use crate::assemble::build_game_data;
use crate::benchmarks::BenchmarkCurves;
use crate::raw::{BenchmarkDocument, PrimaryDocument, SecondaryDocument};
use crate::source::{DocumentSource, FetchError};
use arena_core::{DocumentNames, GameData, ValidationError};
use thiserror::Error;
use tracing::{info, warn};

/// Failures that leave a session unable to start.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("primary trajectory unavailable: {0}")]
    PrimaryUnavailable(#[source] FetchError),
    #[error("failed to parse {document}: {message}")]
    Parse { document: String, message: String },
    #[error("no daily dates in primary trajectory")]
    NoDateAxis,
    #[error("invalid game data: {0}")]
    Invalid(#[from] ValidationError),
}

fn parse_secondary(name: &str, fetched: Result<Vec<u8>, FetchError>) -> Option<SecondaryDocument> {
    let bytes = match fetched {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(document = name, error = %e, "secondary trajectory unavailable");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(document = name, error = %e, "secondary trajectory unparsable");
            None
        }
    }
}

/// Fetch both trajectories concurrently and assemble the game data.
///
/// Only the primary is required; a missing or broken secondary degrades to a
/// flat line.
pub async fn load_game_data<S: DocumentSource>(
    source: &S,
    names: &DocumentNames,
    capital: f64,
) -> Result<GameData, LoadError> {
    let (primary, secondary) = tokio::join!(
        source.fetch(&names.primary),
        source.fetch(&names.secondary)
    );
    let primary = primary.map_err(LoadError::PrimaryUnavailable)?;
    let primary: PrimaryDocument =
        serde_json::from_slice(&primary).map_err(|e| LoadError::Parse {
            document: names.primary.clone(),
            message: e.to_string(),
        })?;
    let secondary = parse_secondary(&names.secondary, secondary);
    let data = build_game_data(&primary, secondary.as_ref(), capital)?;
    info!(
        months = data.months(),
        tickers = data.tickers.len(),
        "game data loaded"
    );
    Ok(data)
}

/// Fetch the benchmark document. Any failure yields `None` for the rest of
/// the session; there is no retry.
pub async fn load_benchmarks<S: DocumentSource>(
    source: &S,
    name: &str,
    capital: f64,
) -> Option<BenchmarkCurves> {
    let bytes = match source.fetch(name).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(document = name, error = %e, "no benchmarks available");
            return None;
        }
    };
    match BenchmarkDocument::from_slice(&bytes) {
        Ok(doc) => {
            let curves = BenchmarkCurves::from_document(&doc, capital);
            info!(curves = curves.available().count(), "benchmarks loaded");
            Some(curves)
        }
        Err(e) => {
            warn!(document = name, error = %e, "failed to parse benchmarks");
            None
        }
    }
}
