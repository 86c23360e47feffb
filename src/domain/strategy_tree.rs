//! Strategy tree enumeration.
//!
//! Starting from a cash state, every buy candidate becomes a child position
//! and every sell candidate of that position becomes a child cash state,
//! alternating until no candidate remains after the last decision. Each
//! level only sees candidates strictly later than the decision that led to
//! it, so depth is bounded by the total number of candidates.
//!
//! The pruned variant only buys below the last realized sale price and only
//! sells above the price paid. It shrinks the tree but is not proven to keep
//! the best outcome; the exhaustive variant is the reference.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::domain::error::TradeTreeError;
use crate::domain::portfolio::PortfolioState;
use crate::domain::signal::SignalSet;
use crate::domain::tick::PriceSeries;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Exhaustive,
    #[default]
    Pruned,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Exhaustive => write!(f, "exhaustive"),
            Variant::Pruned => write!(f, "pruned"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exhaustive" => Ok(Variant::Exhaustive),
            "pruned" | "smart" => Ok(Variant::Pruned),
            other => Err(format!(
                "unknown variant '{other}' (expected pruned or exhaustive)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeConfig {
    pub variant: Variant,
    /// Upper bound on the number of nodes; `None` is unbounded.
    pub max_nodes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyNode {
    pub state: PortfolioState,
    /// Decision tick and resulting node, ascending by tick.
    pub children: Vec<(usize, StrategyNode)>,
}

impl StrategyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, tick: usize) -> Option<&StrategyNode> {
        self.children
            .iter()
            .find(|(t, _)| *t == tick)
            .map(|(_, node)| node)
    }

    pub fn child_ticks(&self) -> Vec<usize> {
        self.children.iter().map(|(t, _)| *t).collect()
    }
}

/// State fields and child ticks share one JSON object: `{"money": 1.0,
/// "best_sale_price": null, "0": {...}, "2": {...}}`.
impl Serialize for StrategyNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.state.serialize_fields(&mut map)?;
        for (tick, child) in &self.children {
            map.serialize_entry(&tick.to_string(), child)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyTree {
    pub variant: Variant,
    pub root: StrategyNode,
    pub node_count: usize,
}

struct TreeBuilder<'a> {
    series: &'a PriceSeries,
    variant: Variant,
    max_nodes: Option<usize>,
    nodes: usize,
}

/// Candidates strictly after `tick`; `times` is ascending.
fn after(times: &[usize], tick: usize) -> &[usize] {
    &times[times.partition_point(|&t| t <= tick)..]
}

impl TreeBuilder<'_> {
    fn count_node(&mut self) -> Result<(), TradeTreeError> {
        self.nodes += 1;
        match self.max_nodes {
            Some(limit) if self.nodes > limit => Err(TradeTreeError::NodeBudgetExceeded { limit }),
            _ => Ok(()),
        }
    }

    fn build(
        &mut self,
        state: PortfolioState,
        buy_times: &[usize],
        sell_times: &[usize],
    ) -> Result<StrategyNode, TradeTreeError> {
        self.count_node()?;
        let mut children = Vec::new();

        match state {
            PortfolioState::Cash {
                money,
                best_sale_price,
            } => {
                for &b in buy_times {
                    let ask = self.series.get(b)?.ask;
                    if self.variant == Variant::Pruned && ask >= best_sale_price {
                        continue;
                    }
                    let next = PortfolioState::bought(money, ask);
                    let child = self.build(next, after(buy_times, b), after(sell_times, b))?;
                    children.push((b, child));
                }
            }
            PortfolioState::Position {
                asset_qty,
                leftover_cash,
                paid_price,
            } => {
                for &s in sell_times {
                    let bid = self.series.get(s)?.bid;
                    if self.variant == Variant::Pruned && bid <= paid_price {
                        continue;
                    }
                    let next = PortfolioState::sold(asset_qty, leftover_cash, bid);
                    let child = self.build(next, after(buy_times, s), after(sell_times, s))?;
                    children.push((s, child));
                }
            }
        }

        Ok(StrategyNode { state, children })
    }
}

fn normalized(times: &[usize]) -> Vec<usize> {
    let mut times = times.to_vec();
    times.sort_unstable();
    times.dedup();
    times
}

/// Enumerate buy/sell sequences over `signals` starting from `initial`.
///
/// Fails without returning a partial tree when a candidate is outside the
/// series or the node budget runs out.
pub fn build_strategy_tree(
    series: &PriceSeries,
    signals: &SignalSet,
    initial: PortfolioState,
    config: &TreeConfig,
) -> Result<StrategyTree, TradeTreeError> {
    let buy_times = normalized(&signals.buy_times);
    let sell_times = normalized(&signals.sell_times);

    debug!(
        asset = %series.asset,
        variant = %config.variant,
        buys = buy_times.len(),
        sells = sell_times.len(),
        "building strategy tree"
    );

    let mut builder = TreeBuilder {
        series,
        variant: config.variant,
        max_nodes: config.max_nodes,
        nodes: 0,
    };
    let root = builder.build(initial, &buy_times, &sell_times)?;

    debug!(asset = %series.asset, nodes = builder.nodes, "strategy tree built");

    Ok(StrategyTree {
        variant: config.variant,
        root,
        node_count: builder.nodes,
    })
}

pub fn build_exhaustive(
    series: &PriceSeries,
    signals: &SignalSet,
    initial: PortfolioState,
) -> Result<StrategyTree, TradeTreeError> {
    let config = TreeConfig {
        variant: Variant::Exhaustive,
        max_nodes: None,
    };
    build_strategy_tree(series, signals, initial, &config)
}

pub fn build_pruned(
    series: &PriceSeries,
    signals: &SignalSet,
    initial: PortfolioState,
) -> Result<StrategyTree, TradeTreeError> {
    let config = TreeConfig {
        variant: Variant::Pruned,
        max_nodes: None,
    };
    build_strategy_tree(series, signals, initial, &config)
}
