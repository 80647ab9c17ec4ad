//! Seeded synthetic market for demos: daily trajectories for two agents and
//! month-end benchmark curves, serialised in the same shapes as real exports.

use crate::raw::{PrimaryDocument, SecondaryDocument};
use crate::source::MemorySource;
use arena_core::DocumentNames;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};

/// Parameters of a generated market.
#[derive(Clone, Debug)]
pub struct SyntheticMarket {
    pub tickers: Vec<String>,
    /// Calendar months of trading days to generate (>= 1).
    pub months: u32,
    pub seed: u64,
    pub start: NaiveDate,
}

impl Default for SyntheticMarket {
    fn default() -> Self {
        Self {
            tickers: ["SPY", "QQQ", "TLT", "GLD", "BTC-USD"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            months: 24,
            seed: 42,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
        }
    }
}

/// Generated documents.
#[derive(Clone, Debug)]
pub struct SyntheticDocuments {
    pub primary: PrimaryDocument,
    pub secondary: SecondaryDocument,
    pub benchmarks: Value,
}

fn iso(d: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
}

fn month_index(d: NaiveDate) -> i32 {
    d.year() * 12 + d.month() as i32
}

fn random_weights(rng: &mut ChaCha8Rng, n: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..n).map(|_| rng.gen_range(0.05..1.0)).collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

impl SyntheticMarket {
    /// Weekdays from `start` spanning `months` calendar months.
    fn trading_days(&self) -> Vec<NaiveDate> {
        let first = month_index(self.start);
        let mut days = Vec::new();
        let mut d = self.start;
        while month_index(d) - first < self.months.max(1) as i32 {
            if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
                days.push(d);
            }
            match d.succ_opt() {
                Some(next) => d = next,
                None => break,
            }
        }
        days
    }

    pub fn generate(&self) -> SyntheticDocuments {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let n = self.tickers.len();
        let profiles: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(-0.0002..0.0008), rng.gen_range(0.003..0.03)))
            .collect();
        let trpo_w = random_weights(&mut rng, n);
        let ppo_w = random_weights(&mut rng, n);
        let spy = self
            .tickers
            .iter()
            .position(|t| t.eq_ignore_ascii_case("SPY"));

        let days = self.trading_days();
        let mut dates = Vec::with_capacity(days.len());
        let mut returns = Vec::with_capacity(days.len());
        let mut trpo_path = Vec::with_capacity(days.len());
        let mut ppo_path = Vec::with_capacity(days.len());
        // Agents report in their own native units.
        let mut trpo = 100.0;
        let mut ppo = 250.0;
        let mut prices = vec![1.0; n];
        let mut month_end_dates: Vec<String> = Vec::new();
        let mut eqw_curve: Vec<f64> = Vec::new();
        let mut spy_curve: Vec<f64> = Vec::new();

        for (i, d) in days.iter().enumerate() {
            let r: Vec<f64> = profiles
                .iter()
                .map(|(drift, vol)| drift + rng.gen_range(-vol..=*vol))
                .collect();
            trpo *= 1.0 + arena_econ::weighted_return(&trpo_w, &r);
            ppo *= 1.0 + arena_econ::weighted_return(&ppo_w, &r);
            for (p, ri) in prices.iter_mut().zip(&r) {
                *p *= 1.0 + ri;
            }
            dates.push(iso(*d));
            returns.push(Some(r.iter().map(|v| Some(*v)).collect()));
            trpo_path.push(Some(trpo));
            ppo_path.push(Some(ppo));

            let month_ends = days.get(i + 1).map_or(true, |next| next.month() != d.month());
            if month_ends {
                month_end_dates.push(iso(*d));
                eqw_curve.push(prices.iter().sum::<f64>() / n.max(1) as f64);
                if let Some(s) = spy {
                    spy_curve.push(prices[s]);
                }
            }
        }

        let weights_row: Vec<Option<f64>> = trpo_w.iter().map(|w| Some(*w)).collect();
        let primary = PrimaryDocument {
            dates: dates.clone(),
            portfolio: trpo_path,
            weights: vec![Some(weights_row); dates.len()],
            asset_returns: returns,
            tickers: self.tickers.clone(),
            asset_tickers: Vec::new(),
        };
        let secondary = SecondaryDocument {
            dates,
            ppo_portfolio: ppo_path,
            ..Default::default()
        };
        let mut curves = json!({ "EqualWeightBH": eqw_curve });
        if spy.is_some() {
            curves["BuyHoldSPY"] = json!(spy_curve);
        }
        let benchmarks = json!({ "dates": month_end_dates, "curves": curves });
        SyntheticDocuments {
            primary,
            secondary,
            benchmarks,
        }
    }
}

impl SyntheticDocuments {
    /// Serve the generated documents under the configured names.
    pub fn into_source(self, names: &DocumentNames) -> Result<MemorySource, serde_json::Error> {
        Ok(MemorySource::new()
            .with(names.primary.clone(), serde_json::to_vec(&self.primary)?)
            .with(names.secondary.clone(), serde_json::to_vec(&self.secondary)?)
            .with(names.benchmarks.clone(), serde_json::to_vec(&self.benchmarks)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_game_data, BenchmarkCurves, BenchmarkDocument};
    use arena_core::CompetitorId;

    #[test]
    fn same_seed_same_market() {
        let m = SyntheticMarket::default();
        let a = m.generate();
        let b = m.generate();
        assert_eq!(a.primary, b.primary);
        assert_eq!(a.benchmarks, b.benchmarks);
    }

    #[test]
    fn covers_requested_months_on_weekdays() {
        let m = SyntheticMarket {
            months: 3,
            ..Default::default()
        };
        let docs = m.generate();
        let data = build_game_data(&docs.primary, Some(&docs.secondary), 1_000_000.0).unwrap();
        assert_eq!(data.dates.len(), 3);
        assert_eq!(data.tickers.len(), 5);
        assert!((data.trpo_portfolio[0] - 1_000_000.0).abs() < 1e-6);
        assert!((data.ppo_portfolio[0] - 1_000_000.0).abs() < 1e-6);
        // 2020-01-04 was a Saturday
        assert!(!docs.primary.dates.contains(&"2020-01-04".to_string()));
    }

    #[test]
    fn benchmarks_have_one_point_per_month() {
        let m = SyntheticMarket {
            months: 6,
            ..Default::default()
        };
        let docs = m.generate();
        let doc = BenchmarkDocument::from_value(&docs.benchmarks);
        let curves = BenchmarkCurves::from_document(&doc, 1_000_000.0);
        assert_eq!(curves.curve(CompetitorId::EqualWeightBh).map(<[f64]>::len), Some(6));
        assert_eq!(curves.curve(CompetitorId::BuyHoldSpy).map(<[f64]>::len), Some(6));
        assert!(curves.curve(CompetitorId::CvarMin).is_none());
    }

    #[tokio::test]
    async fn serves_documents_under_configured_names() {
        let names = DocumentNames::default();
        let src = SyntheticMarket::default().generate().into_source(&names).unwrap();
        let data = crate::load_game_data(&src, &names, 1_000_000.0).await.unwrap();
        assert_eq!(data.months(), 24);
    }
}
