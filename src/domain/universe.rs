//! Asset selection.
//!
//! Parses asset lists from configuration or the command line and resolves
//! them against the loaded price table.

use crate::domain::error::TradeTreeError;
use crate::domain::price_table::PriceTable;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetListError {
    #[error("empty token in asset list")]
    EmptyToken,

    #[error("duplicate asset: {0}")]
    DuplicateAsset(String),
}

/// Comma-separated asset names, trimmed. Names are case-sensitive.
pub fn parse_assets(input: &str) -> Result<Vec<String>, AssetListError> {
    let mut assets = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let name = token.trim();
        if name.is_empty() {
            return Err(AssetListError::EmptyToken);
        }
        if !seen.insert(name.to_string()) {
            return Err(AssetListError::DuplicateAsset(name.to_string()));
        }
        assets.push(name.to_string());
    }

    Ok(assets)
}

/// The requested assets, or every asset in the table when none are named.
pub fn select_assets(
    table: &PriceTable,
    requested: &[String],
) -> Result<Vec<String>, TradeTreeError> {
    if requested.is_empty() {
        return Ok(table.asset_names());
    }
    for name in requested {
        table.series(name)?;
    }
    Ok(requested.to_vec())
}
