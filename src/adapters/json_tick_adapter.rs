//! JSON tick file adapter.
//!
//! Expected layout: an array of `{"name": "...", "ticks": [[bid, ask], ...]}`
//! records, one per asset. Ticks are numbered by position.

use crate::domain::error::TradeTreeError;
use crate::domain::price_table::{PriceTable, TickRecord};
use crate::ports::tick_data_port::TickDataPort;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct JsonTickAdapter {
    path: PathBuf,
}

impl JsonTickAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn parse(source_name: &str, content: &str) -> Result<PriceTable, TradeTreeError> {
        let records: Vec<TickRecord> =
            serde_json::from_str(content).map_err(|e| TradeTreeError::Load {
                source_name: source_name.to_string(),
                reason: format!("JSON parse error: {e}"),
            })?;
        PriceTable::from_records(source_name, records)
    }
}

impl TickDataPort for JsonTickAdapter {
    fn load_table(&self) -> Result<PriceTable, TradeTreeError> {
        let source_name = self.path.display().to_string();
        let content = fs::read_to_string(&self.path).map_err(|e| TradeTreeError::Load {
            source_name: source_name.clone(),
            reason: format!("failed to read: {e}"),
        })?;
        let table = Self::parse(&source_name, &content)?;
        debug!(
            path = %source_name,
            assets = table.asset_names().len(),
            ticks = table.tick_count(),
            "loaded JSON ticks"
        );
        Ok(table)
    }
}
