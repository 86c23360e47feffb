//! Portfolio state carried down the strategy tree.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Either all cash or a whole-lot position in the asset, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortfolioState {
    Cash {
        money: f64,
        /// Bid of the most recent sale; `INFINITY` before the first sale.
        best_sale_price: f64,
    },
    Position {
        asset_qty: u64,
        /// Cash too small to buy another unit.
        leftover_cash: f64,
        paid_price: f64,
    },
}

impl PortfolioState {
    pub fn initial(money: f64) -> Self {
        PortfolioState::Cash {
            money,
            best_sale_price: f64::INFINITY,
        }
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, PortfolioState::Cash { .. })
    }

    /// Money on hand for a cash state.
    pub fn money(&self) -> Option<f64> {
        match *self {
            PortfolioState::Cash { money, .. } => Some(money),
            PortfolioState::Position { .. } => None,
        }
    }

    /// Spend `money` on whole units at `ask`.
    pub fn bought(money: f64, ask: f64) -> Self {
        let (asset_qty, leftover_cash) = buy_lots(money, ask);
        PortfolioState::Position {
            asset_qty,
            leftover_cash,
            paid_price: ask,
        }
    }

    /// Sell every unit of a position at `bid`.
    pub fn sold(asset_qty: u64, leftover_cash: f64, bid: f64) -> Self {
        PortfolioState::Cash {
            money: asset_qty as f64 * bid + leftover_cash,
            best_sale_price: bid,
        }
    }

    pub(crate) fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match *self {
            PortfolioState::Cash {
                money,
                best_sale_price,
            } => {
                map.serialize_entry("money", &money)?;
                let best = best_sale_price.is_finite().then_some(best_sale_price);
                map.serialize_entry("best_sale_price", &best)?;
            }
            PortfolioState::Position {
                asset_qty,
                leftover_cash,
                paid_price,
            } => {
                map.serialize_entry("asset", &asset_qty)?;
                map.serialize_entry("leftover_cash", &leftover_cash)?;
                map.serialize_entry("paid_price", &paid_price)?;
            }
        }
        Ok(())
    }
}

impl Serialize for PortfolioState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_fields(&mut map)?;
        map.end()
    }
}

/// Whole units of `ask` affordable with `money`, and the remainder.
///
/// Guarantees `qty * ask + leftover == money` and `0 <= leftover < ask`.
/// The quotient is nudged by one lot when `money / ask` rounds across an
/// integer.
pub fn buy_lots(money: f64, ask: f64) -> (u64, f64) {
    let mut qty = (money / ask).floor().max(0.0);
    let mut cost = qty * ask;
    if cost > money && qty > 0.0 {
        qty -= 1.0;
        cost = qty * ask;
    } else if money - cost >= ask && (qty + 1.0) * ask <= money {
        qty += 1.0;
        cost = qty * ask;
    }
    (qty as u64, money - cost)
}
