//! Turning-point extraction.
//!
//! A sell candidate is a tick where the bid trend turns from rising to
//! falling (a local peak). A buy candidate is a tick where the ask trend
//! turns from falling to rising (a local trough). `trend[k]` describes the
//! step ending at tick `k + 1`, so a reversal between `trend[k]` and
//! `trend[k + 1]` marks tick `k + 1`.

use crate::domain::error::TradeTreeError;
use crate::domain::tick::PriceSeries;
use crate::domain::trend::{find_trend, Direction};
use serde::Serialize;

/// Candidate decision ticks, each list ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalSet {
    pub buy_times: Vec<usize>,
    pub sell_times: Vec<usize>,
}

impl SignalSet {
    /// `(tick, ask)` for every buy candidate.
    pub fn buy_markers(&self, series: &PriceSeries) -> Result<Vec<(usize, f64)>, TradeTreeError> {
        self.buy_times
            .iter()
            .map(|&t| series.get(t).map(|tick| (t, tick.ask)))
            .collect()
    }

    /// `(tick, bid)` for every sell candidate.
    pub fn sell_markers(&self, series: &PriceSeries) -> Result<Vec<(usize, f64)>, TradeTreeError> {
        self.sell_times
            .iter()
            .map(|&t| series.get(t).map(|tick| (t, tick.bid)))
            .collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.buy_times.len() + self.sell_times.len()
    }
}

fn reversal_times(trend: &[Direction], from: Direction) -> Vec<usize> {
    trend
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] == from && pair[1] == from.reversed())
        .map(|(k, _)| k + 1)
        .collect()
}

/// Ticks just before the bid price starts to decline.
pub fn find_sell_times(bids: &[f64]) -> Result<Vec<usize>, TradeTreeError> {
    let trend = find_trend(bids)?;
    Ok(reversal_times(&trend, Direction::Rising))
}

/// Ticks just before the ask price starts to rise.
pub fn find_buy_times(asks: &[f64]) -> Result<Vec<usize>, TradeTreeError> {
    let trend = find_trend(asks)?;
    Ok(reversal_times(&trend, Direction::Falling))
}

/// Buy candidates from the ask column plus tick 0, sell candidates from the
/// bid column. The first tick is always a buy candidate since no earlier
/// trend exists to judge it by.
pub fn extract_signals(series: &PriceSeries) -> Result<SignalSet, TradeTreeError> {
    series.ensure_min_len()?;

    let mut buy_times = find_buy_times(&series.ask_column())?;
    if buy_times.first() != Some(&0) {
        buy_times.insert(0, 0);
    }
    let sell_times = find_sell_times(&series.bid_column())?;

    Ok(SignalSet {
        buy_times,
        sell_times,
    })
}
