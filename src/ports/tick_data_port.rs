//! Tick data access port trait.

use crate::domain::error::TradeTreeError;
use crate::domain::price_table::PriceTable;

pub trait TickDataPort {
    /// Load and align every asset in the source.
    fn load_table(&self) -> Result<PriceTable, TradeTreeError>;
}
