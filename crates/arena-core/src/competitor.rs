use serde::{Deserialize, Serialize};

/// Stable identifier for everything that can appear in the standings.
///
/// Variant order is the insertion order used when ranking, so equal values
/// resolve in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompetitorId {
    Player,
    TrpoAgent,
    PpoAgent,
    EqualWeightBh,
    BuyHoldSpy,
    CvarMin,
    RiskParity,
    MvoMaxSharpe,
}

/// Standings section a competitor is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitorGroup {
    You,
    Agents,
    Benchmarks,
}

/// Static presentation data for a competitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompetitorInfo {
    /// Display label; the player's label is replaced by the session's name.
    pub label: &'static str,
    /// CSS color token used for rows and chart lines.
    pub color: &'static str,
    pub group: CompetitorGroup,
    /// Keys under which a benchmark document may publish this curve.
    pub benchmark_keys: &'static [&'static str],
}

impl CompetitorId {
    pub const ALL: [CompetitorId; 8] = [
        CompetitorId::Player,
        CompetitorId::TrpoAgent,
        CompetitorId::PpoAgent,
        CompetitorId::EqualWeightBh,
        CompetitorId::BuyHoldSpy,
        CompetitorId::CvarMin,
        CompetitorId::RiskParity,
        CompetitorId::MvoMaxSharpe,
    ];

    pub const BENCHMARKS: [CompetitorId; 5] = [
        CompetitorId::EqualWeightBh,
        CompetitorId::BuyHoldSpy,
        CompetitorId::CvarMin,
        CompetitorId::RiskParity,
        CompetitorId::MvoMaxSharpe,
    ];

    pub const fn info(self) -> CompetitorInfo {
        use CompetitorGroup::*;
        match self {
            CompetitorId::Player => CompetitorInfo {
                label: "You",
                color: "#22c55e",
                group: You,
                benchmark_keys: &[],
            },
            CompetitorId::TrpoAgent => CompetitorInfo {
                label: "TRPO Agent",
                color: "#a5b4fc",
                group: Agents,
                benchmark_keys: &[],
            },
            CompetitorId::PpoAgent => CompetitorInfo {
                label: "PPO Agent",
                color: "#fb7185",
                group: Agents,
                benchmark_keys: &[],
            },
            CompetitorId::EqualWeightBh => CompetitorInfo {
                label: "Equal-Weight BH",
                color: "#38bdf8",
                group: Benchmarks,
                benchmark_keys: &["EqualWeightBH", "Equal-Weight BH"],
            },
            CompetitorId::BuyHoldSpy => CompetitorInfo {
                label: "Buy & Hold SPY",
                color: "#facc15",
                group: Benchmarks,
                benchmark_keys: &["BuyHoldSPY"],
            },
            CompetitorId::CvarMin => CompetitorInfo {
                label: "CVaR Min",
                color: "#e5e7eb",
                group: Benchmarks,
                benchmark_keys: &["CVaR_Min"],
            },
            CompetitorId::RiskParity => CompetitorInfo {
                label: "Risk Parity (InvVol)",
                color: "#fb923c",
                group: Benchmarks,
                benchmark_keys: &["RiskParityInvVol"],
            },
            CompetitorId::MvoMaxSharpe => CompetitorInfo {
                label: "MVO (Max Sharpe)",
                color: "#6366f1",
                group: Benchmarks,
                benchmark_keys: &["MVO_MaxSharpe"],
            },
        }
    }

    /// Label to show, substituting the player's name for [`CompetitorId::Player`].
    pub fn display_name<'a>(self, player_name: &'a str) -> &'a str {
        match self {
            CompetitorId::Player => player_name,
            other => other.info().label,
        }
    }

    pub fn is_benchmark(self) -> bool {
        self.info().group == CompetitorGroup::Benchmarks
    }
}

/// Rank-based award for the top three places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Award {
    Gold,
    Silver,
    Bronze,
}

impl Award {
    /// Award for a 0-based sort position.
    pub fn for_rank(rank: usize) -> Option<Award> {
        match rank {
            0 => Some(Award::Gold),
            1 => Some(Award::Silver),
            2 => Some(Award::Bronze),
            _ => None,
        }
    }

    pub fn medal(self) -> &'static str {
        match self {
            Award::Gold => "🥇",
            Award::Silver => "🥈",
            Award::Bronze => "🥉",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Award::Gold => "Gold",
            Award::Silver => "Silver",
            Award::Bronze => "Bronze",
        }
    }
}
