/// Tickers shown together under one heading in the allocation panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetGroup {
    pub title: &'static str,
    pub tickers: Vec<String>,
}

const GROUPS: [(&str, &[&str]); 5] = [
    ("Equities", &["SPY", "QQQ", "IWM", "EFA"]),
    ("Bonds", &["TLT", "IEF", "LQD", "HYG"]),
    ("Commodities", &["GLD", "DBC"]),
    ("Crypto", &["BTC-USD", "ETH-USD"]),
    ("Currencies", &["UUP", "FXE"]),
];

/// Partition tracked tickers into display groups.
///
/// Known tickers keep the group's own order; anything unrecognised lands in
/// a trailing "Other" group in tracked order. Empty groups are skipped.
pub fn asset_groups(tickers: &[String]) -> Vec<AssetGroup> {
    let mut out = Vec::new();
    for (title, members) in GROUPS {
        let present: Vec<String> = members
            .iter()
            .filter(|m| tickers.iter().any(|t| t == *m))
            .map(|m| m.to_string())
            .collect();
        if !present.is_empty() {
            out.push(AssetGroup {
                title,
                tickers: present,
            });
        }
    }
    let other: Vec<String> = tickers
        .iter()
        .filter(|t| !GROUPS.iter().any(|(_, m)| m.contains(&t.as_str())))
        .cloned()
        .collect();
    if !other.is_empty() {
        out.push(AssetGroup {
            title: "Other",
            tickers: other,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn groups_known_and_other() {
        let groups = asset_groups(&tickers(&["TLT", "SPY", "XYZ", "GLD", "QQQ"]));
        let titles: Vec<&str> = groups.iter().map(|g| g.title).collect();
        assert_eq!(titles, vec!["Equities", "Bonds", "Commodities", "Other"]);
        assert_eq!(groups[0].tickers, tickers(&["SPY", "QQQ"]));
        assert_eq!(groups[3].tickers, tickers(&["XYZ"]));
    }

    #[test]
    fn no_tickers_no_groups() {
        assert!(asset_groups(&[]).is_empty());
    }
}
