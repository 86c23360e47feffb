//! Bid/ask tick quotes and per-asset price series.

use crate::domain::error::TradeTreeError;

/// Minimum number of ticks for trend detection to have at least one step.
pub const MIN_TICKS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub time: usize,
    pub bid: f64,
    pub ask: f64,
}

/// Ticks of a single asset, indexed by contiguous integer time from 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub asset: String,
    ticks: Vec<Tick>,
}

impl PriceSeries {
    /// Assigns times `0..len` to the `(bid, ask)` pairs in order.
    pub fn from_quotes(asset: impl Into<String>, quotes: &[(f64, f64)]) -> Self {
        let ticks = quotes
            .iter()
            .enumerate()
            .map(|(time, &(bid, ask))| Tick { time, bid, ask })
            .collect();
        Self {
            asset: asset.into(),
            ticks,
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn get(&self, time: usize) -> Result<&Tick, TradeTreeError> {
        self.ticks.get(time).ok_or(TradeTreeError::TickOutOfRange {
            tick: time,
            len: self.ticks.len(),
        })
    }

    pub fn bid_column(&self) -> Vec<f64> {
        self.ticks.iter().map(|t| t.bid).collect()
    }

    pub fn ask_column(&self) -> Vec<f64> {
        self.ticks.iter().map(|t| t.ask).collect()
    }

    pub fn ensure_min_len(&self) -> Result<(), TradeTreeError> {
        if self.ticks.len() < MIN_TICKS {
            return Err(TradeTreeError::InsufficientData {
                len: self.ticks.len(),
                minimum: MIN_TICKS,
            });
        }
        Ok(())
    }
}
