//! Aligned multi-asset price table.
//!
//! Raw per-asset records are turned into one [`PriceSeries`] per asset, each
//! indexed by tick `0..len`. Lookups by asset name go through a name index.

use crate::domain::error::TradeTreeError;
use crate::domain::tick::PriceSeries;
use serde::Deserialize;
use std::collections::HashMap;

/// One raw input record: an asset name and its `[bid, ask]` pairs in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TickRecord {
    pub name: String,
    pub ticks: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct PriceTable {
    series: Vec<PriceSeries>,
    name_index: HashMap<String, usize>,
}

impl PriceTable {
    /// Validates and aligns raw records. `source_name` only labels errors.
    pub fn from_records(
        source_name: &str,
        records: Vec<TickRecord>,
    ) -> Result<Self, TradeTreeError> {
        if records.is_empty() {
            return Err(load_error(source_name, "no asset records".into()));
        }

        let mut series = Vec::with_capacity(records.len());
        let mut name_index = HashMap::with_capacity(records.len());

        for record in records {
            if record.name.trim().is_empty() {
                return Err(load_error(source_name, "asset with empty name".into()));
            }
            if name_index.contains_key(&record.name) {
                return Err(load_error(
                    source_name,
                    format!("duplicate asset {}", record.name),
                ));
            }
            for (time, &[bid, ask]) in record.ticks.iter().enumerate() {
                validate_price(source_name, &record.name, time, "bid", bid)?;
                validate_price(source_name, &record.name, time, "ask", ask)?;
            }

            let quotes: Vec<(f64, f64)> = record.ticks.iter().map(|&[b, a]| (b, a)).collect();
            name_index.insert(record.name.clone(), series.len());
            series.push(PriceSeries::from_quotes(record.name, &quotes));
        }

        Ok(Self { series, name_index })
    }

    /// Asset names in input order.
    pub fn asset_names(&self) -> Vec<String> {
        self.series.iter().map(|s| s.asset.clone()).collect()
    }

    pub fn series(&self, name: &str) -> Result<&PriceSeries, TradeTreeError> {
        self.name_index
            .get(name)
            .map(|&i| &self.series[i])
            .ok_or_else(|| TradeTreeError::UnknownAsset {
                name: name.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> {
        self.series.iter()
    }

    pub fn bid_column(&self, name: &str) -> Result<Vec<f64>, TradeTreeError> {
        Ok(self.series(name)?.bid_column())
    }

    pub fn ask_column(&self, name: &str) -> Result<Vec<f64>, TradeTreeError> {
        Ok(self.series(name)?.ask_column())
    }

    /// Length of the shared timeline (the longest asset).
    pub fn tick_count(&self) -> usize {
        self.series.iter().map(PriceSeries::len).max().unwrap_or(0)
    }
}

fn load_error(source_name: &str, reason: String) -> TradeTreeError {
    TradeTreeError::Load {
        source_name: source_name.to_string(),
        reason,
    }
}

fn validate_price(
    source_name: &str,
    asset: &str,
    time: usize,
    side: &str,
    price: f64,
) -> Result<(), TradeTreeError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(load_error(
            source_name,
            format!("{asset} tick {time}: {side} price must be positive, got {price}"),
        ));
    }
    Ok(())
}
