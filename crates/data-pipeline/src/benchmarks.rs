//! Static benchmark strategies, rebased to the starting capital.

use crate::raw::BenchmarkDocument;
use arena_core::CompetitorId;
use arena_econ::rebase;
use std::collections::BTreeMap;
use tracing::debug;

/// Benchmark value curves that were present in the document.
///
/// A strategy missing from the document, or present with no values, is
/// simply absent here; callers treat it as unavailable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchmarkCurves {
    dates: Vec<String>,
    curves: BTreeMap<CompetitorId, Vec<f64>>,
}

/// Fill gaps without moving any point off its month: leading gaps take the
/// first known value, later ones the previous value. Empty when nothing is
/// known.
fn fill_gaps(points: &[Option<f64>]) -> Vec<f64> {
    let known = |p: &Option<f64>| p.filter(|v| v.is_finite());
    let Some(first) = points.iter().find_map(known) else {
        return Vec::new();
    };
    let mut last = first;
    points
        .iter()
        .map(|p| {
            if let Some(v) = known(p) {
                last = v;
            }
            last
        })
        .collect()
}

impl BenchmarkCurves {
    pub fn from_document(doc: &BenchmarkDocument, capital: f64) -> Self {
        let mut curves = BTreeMap::new();
        for id in CompetitorId::BENCHMARKS {
            let raw = id
                .info()
                .benchmark_keys
                .iter()
                .find_map(|k| doc.curves.get(*k));
            let Some(raw) = raw else {
                debug!(benchmark = id.info().label, "benchmark curve unavailable");
                continue;
            };
            let filled = fill_gaps(raw);
            if filled.is_empty() {
                continue;
            }
            curves.insert(id, rebase(&filled, capital));
        }
        Self {
            dates: doc.dates.clone(),
            curves,
        }
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    /// Full rebased curve for a benchmark, if available.
    pub fn curve(&self, id: CompetitorId) -> Option<&[f64]> {
        self.curves.get(&id).map(Vec::as_slice)
    }

    /// Value at a step, clamped to the curve's last point.
    pub fn value_at(&self, id: CompetitorId, step: usize) -> Option<f64> {
        let curve = self.curve(id)?;
        curve.get(step.min(curve.len() - 1)).copied()
    }

    pub fn available(&self) -> impl Iterator<Item = CompetitorId> + '_ {
        self.curves.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
