//! Serde models of the exported trajectory and benchmark documents.

use arena_core::{DailyTrajectory, RawReturnRow};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Numeric cells: anything that is not a JSON number reads as a gap.
fn lenient_numbers<'de, D>(d: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let cells = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(cells.iter().map(Value::as_f64).collect())
}

/// Rows of numeric cells; a row that is not an array is a missing row.
fn lenient_rows<'de, D>(d: D) -> Result<Vec<Option<Vec<Option<f64>>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(rows
        .iter()
        .map(|row| {
            row.as_array()
                .map(|cells| cells.iter().map(Value::as_f64).collect())
        })
        .collect())
}

fn weights_path(rows: &[Option<Vec<Option<f64>>>]) -> Vec<Option<Vec<f64>>> {
    rows.iter()
        .map(|row| {
            row.as_ref()
                .map(|r| r.iter().map(|w| w.unwrap_or(0.0)).collect())
        })
        .collect()
}

/// Primary trajectory: owns the date axis and the asset returns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Vec<String>,
    #[serde(rename = "trpoPortfolio", default, deserialize_with = "lenient_numbers")]
    pub portfolio: Vec<Option<f64>>,
    #[serde(rename = "trpoWeights", default, deserialize_with = "lenient_rows")]
    pub weights: Vec<Option<Vec<Option<f64>>>>,
    #[serde(rename = "assetReturns", default, deserialize_with = "lenient_rows")]
    pub asset_returns: Vec<RawReturnRow>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tickers: Vec<String>,
    #[serde(rename = "ASSET_TICKERS", default, deserialize_with = "null_as_default")]
    pub asset_tickers: Vec<String>,
}

impl PrimaryDocument {
    pub fn to_trajectory(&self) -> DailyTrajectory {
        DailyTrajectory {
            dates: self.dates.clone(),
            asset_returns: self.asset_returns.clone(),
            portfolio_path: self.portfolio.clone(),
            weights_path: weights_path(&self.weights),
        }
    }
}

/// Secondary trajectory: its own date axis and value path.
///
/// Older exports reuse the primary's field names, so `trpoPortfolio` is
/// accepted when `ppoPortfolio` is missing or empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Vec<String>,
    #[serde(rename = "ppoPortfolio", default, deserialize_with = "lenient_numbers")]
    pub ppo_portfolio: Vec<Option<f64>>,
    #[serde(rename = "trpoPortfolio", default, deserialize_with = "lenient_numbers")]
    pub trpo_portfolio: Vec<Option<f64>>,
    #[serde(rename = "ppoWeights", default, deserialize_with = "lenient_rows")]
    pub ppo_weights: Vec<Option<Vec<Option<f64>>>>,
    #[serde(rename = "assetReturns", default, deserialize_with = "lenient_rows")]
    pub asset_returns: Vec<RawReturnRow>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tickers: Vec<String>,
    #[serde(rename = "ASSET_TICKERS", default, deserialize_with = "null_as_default")]
    pub asset_tickers: Vec<String>,
}

impl SecondaryDocument {
    pub fn portfolio(&self) -> &[Option<f64>] {
        if self.ppo_portfolio.is_empty() {
            &self.trpo_portfolio
        } else {
            &self.ppo_portfolio
        }
    }

    /// Usable only with a date axis and a value path.
    pub fn is_usable(&self) -> bool {
        !self.dates.is_empty() && !self.portfolio().is_empty()
    }
}

/// Benchmark document: named value curves, either under `curves` or at the
/// top level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchmarkDocument {
    pub dates: Vec<String>,
    pub curves: BTreeMap<String, Vec<Option<f64>>>,
}

impl BenchmarkDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_value(value: &Value) -> Self {
        let dates = value
            .get("dates")
            .and_then(Value::as_array)
            .map(|ds| {
                ds.iter()
                    .filter_map(|d| d.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let container = match value.get("curves") {
            Some(c) if c.is_object() => c,
            _ => value,
        };
        let mut curves = BTreeMap::new();
        if let Some(obj) = container.as_object() {
            for (name, v) in obj {
                let Some(points) = v.as_array() else {
                    continue;
                };
                let curve: Vec<Option<f64>> = points.iter().map(Value::as_f64).collect();
                if curve.iter().any(Option::is_some) {
                    curves.insert(name.clone(), curve);
                }
            }
        }
        Self { dates, curves }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_tolerates_nulls_and_missing_fields() {
        let json = r#"{
            "dates": ["2020-01-02"],
            "trpoPortfolio": [null],
            "trpoWeights": [[0.5, null]],
            "tickers": null
        }"#;
        let doc: PrimaryDocument = serde_json::from_str(json).unwrap();
        assert!(doc.tickers.is_empty());
        assert!(doc.asset_returns.is_empty());
        let t = doc.to_trajectory();
        assert_eq!(t.portfolio_path, vec![None]);
        assert_eq!(t.weights_path, vec![Some(vec![0.5, 0.0])]);
    }

    #[test]
    fn mistyped_cells_read_as_gaps() {
        let json = r#"{
            "dates": ["2020-01-02", "2020-01-03", "2020-01-06"],
            "trpoPortfolio": [1.0, "n/a", true],
            "trpoWeights": ["bad", [0.5, "x"]],
            "assetReturns": [[0.01, "0.02"], 7, null]
        }"#;
        let doc: PrimaryDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.portfolio, vec![Some(1.0), None, None]);
        assert_eq!(doc.weights, vec![None, Some(vec![Some(0.5), None])]);
        assert_eq!(
            doc.asset_returns,
            vec![Some(vec![Some(0.01), None]), None, None]
        );

        let json = r#"{ "dates": ["2020-01-02"], "ppoPortfolio": ["1e6", 2.0] }"#;
        let doc: SecondaryDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.portfolio(), &[None, Some(2.0)]);
    }

    #[test]
    fn secondary_falls_back_to_primary_field_name() {
        let json = r#"{ "dates": ["2020-01-02"], "trpoPortfolio": [7.0] }"#;
        let doc: SecondaryDocument = serde_json::from_str(json).unwrap();
        assert!(doc.is_usable());
        assert_eq!(doc.portfolio(), &[Some(7.0)]);

        let empty: SecondaryDocument = serde_json::from_str(r#"{ "dates": [] }"#).unwrap();
        assert!(!empty.is_usable());
    }

    #[test]
    fn benchmark_curves_nested_or_flat() {
        let nested = br#"{ "dates": ["2020-01-31"], "curves": { "BuyHoldSPY": [1.0, 2.0] } }"#;
        let doc = BenchmarkDocument::from_slice(nested).unwrap();
        assert_eq!(doc.dates, vec!["2020-01-31"]);
        assert_eq!(doc.curves["BuyHoldSPY"], vec![Some(1.0), Some(2.0)]);

        let flat = br#"{ "dates": ["2020-01-31"], "CVaR_Min": [3.0, null] }"#;
        let doc = BenchmarkDocument::from_slice(flat).unwrap();
        assert_eq!(doc.curves["CVaR_Min"], vec![Some(3.0), None]);
        // dates hold no numbers and are not a curve
        assert!(!doc.curves.contains_key("dates"));
    }

    #[test]
    fn benchmark_rejects_invalid_json() {
        assert!(BenchmarkDocument::from_slice(b"not json").is_err());
    }
}
