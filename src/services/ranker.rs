//! Cross-sectional ranking of per-symbol alert results.

use std::cmp::Ordering;

use crate::types::{AlertResult, RankedAlert, Ranking};

pub struct CrossSectionalRanker;

impl CrossSectionalRanker {
    /// Rank symbols by volume change, largest first.
    ///
    /// Equal volume changes are ordered by symbol so the output does not
    /// depend on input order. The divergent and triggered lists are filtered
    /// views of the ranked list.
    pub fn rank<I, S>(results: I) -> Ranking
    where
        I: IntoIterator<Item = (S, AlertResult)>,
        S: Into<String>,
    {
        let mut by_volume: Vec<RankedAlert> = results
            .into_iter()
            .map(|(symbol, alert)| RankedAlert {
                symbol: symbol.into(),
                alert,
            })
            .collect();

        by_volume.sort_by(|a, b| {
            b.alert
                .volume_pct_change
                .total_cmp(&a.alert.volume_pct_change)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });

        let divergent = by_volume
            .iter()
            .filter(|r| r.alert.divergence)
            .cloned()
            .collect();
        let triggered = by_volume
            .iter()
            .filter(|r| r.alert.triggered)
            .cloned()
            .collect();

        Ranking {
            by_volume,
            divergent,
            triggered,
        }
    }
}

/// Order helper for callers sorting by price move instead.
pub fn by_abs_price_change(a: &RankedAlert, b: &RankedAlert) -> Ordering {
    b.alert
        .price_pct_change
        .abs()
        .total_cmp(&a.alert.price_pct_change.abs())
        .then_with(|| a.symbol.cmp(&b.symbol))
}
