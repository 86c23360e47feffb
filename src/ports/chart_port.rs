//! Chart rendering port trait.

use std::path::Path;

use crate::domain::error::TradeTreeError;
use crate::domain::outcome::BestPath;
use crate::domain::signal::SignalSet;
use crate::domain::tick::PriceSeries;

/// Everything a renderer needs for one asset.
#[derive(Debug, Clone, Copy)]
pub struct ChartData<'a> {
    pub series: &'a PriceSeries,
    pub signals: &'a SignalSet,
    pub best_path: Option<&'a BestPath>,
}

/// Port for writing price charts with buy/sell markers.
pub trait ChartPort {
    fn render(&self, chart: &ChartData, output_path: &Path) -> Result<(), TradeTreeError>;
}
