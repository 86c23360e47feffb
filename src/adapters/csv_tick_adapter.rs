//! CSV tick file adapter.
//!
//! Expected header `asset,bid,ask`. Rows of one asset appear in tick order;
//! assets may be interleaved. Assets keep the order of their first row.

use crate::domain::error::TradeTreeError;
use crate::domain::price_table::{PriceTable, TickRecord};
use crate::ports::tick_data_port::TickDataPort;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvTickAdapter {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    asset: String,
    bid: f64,
    ask: f64,
}

impl CsvTickAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn parse(source_name: &str, content: &str) -> Result<PriceTable, TradeTreeError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut records: Vec<TickRecord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| TradeTreeError::Load {
                source_name: source_name.to_string(),
                reason: format!("CSV parse error on row {}: {}", line + 1, e),
            })?;

            let slot = *index.entry(row.asset.clone()).or_insert_with(|| {
                records.push(TickRecord {
                    name: row.asset.clone(),
                    ticks: Vec::new(),
                });
                records.len() - 1
            });
            records[slot].ticks.push([row.bid, row.ask]);
        }

        PriceTable::from_records(source_name, records)
    }
}

impl TickDataPort for CsvTickAdapter {
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
            "loaded CSV ticks"
        );
        Ok(table)
    }
}
