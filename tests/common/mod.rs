#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;

use tradetree::domain::error::TradeTreeError;
use tradetree::domain::portfolio::PortfolioState;
use tradetree::domain::price_table::{PriceTable, TickRecord};
use tradetree::domain::strategy_tree::StrategyNode;
use tradetree::domain::tick::PriceSeries;
use tradetree::ports::tick_data_port::TickDataPort;

pub struct MockTickDataPort {
    pub records: Vec<TickRecord>,
    pub error: Option<String>,
    pub loads: std::cell::Cell<usize>,
}

impl MockTickDataPort {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            error: None,
            loads: std::cell::Cell::new(0),
        }
    }

    pub fn with_quotes(mut self, name: &str, quotes: &[(f64, f64)]) -> Self {
        self.records.push(TickRecord {
            name: name.to_string(),
            ticks: quotes.iter().map(|&(b, a)| [b, a]).collect(),
        });
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TickDataPort for MockTickDataPort {
    fn load_table(&self) -> Result<PriceTable, TradeTreeError> {
        self.loads.set(self.loads.get() + 1);
        if let Some(reason) = &self.error {
            return Err(TradeTreeError::Load {
                source_name: "mock".into(),
                reason: reason.clone(),
            });
        }
        PriceTable::from_records("mock", self.records.clone())
    }
}

/// Five ticks with two local highs and two local lows.
pub const SCENARIO: [(f64, f64); 5] = [
    (10.0, 11.0),
    (12.0, 13.0),
    (9.0, 10.0),
    (14.0, 15.0),
    (8.0, 9.0),
];

pub fn scenario_series() -> PriceSeries {
    PriceSeries::from_quotes("TEST", &SCENARIO)
}

pub const SCENARIO_JSON: &str = r#"[
    {"name": "TEST", "ticks": [[10.0, 11.0], [12.0, 13.0], [9.0, 10.0], [14.0, 15.0], [8.0, 9.0]]},
    {"name": "UP", "ticks": [[1.0, 1.1], [2.0, 2.1], [3.0, 3.1]]}
]"#;

pub fn write_temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Visit every (parent, tick, child) edge of a tree.
pub fn for_each_edge(node: &StrategyNode, f: &mut dyn FnMut(&PortfolioState, usize, &StrategyNode)) {
    for (tick, child) in &node.children {
        f(&node.state, *tick, child);
        for_each_edge(child, f);
    }
}

pub fn depth(node: &StrategyNode) -> usize {
    node.children
        .iter()
        .map(|(_, c)| 1 + depth(c))
        .max()
        .unwrap_or(0)
}

pub fn leaf_count(node: &StrategyNode) -> usize {
    if node.is_leaf() {
        1
    } else {
        node.children.iter().map(|(_, c)| leaf_count(c)).sum()
    }
}

pub fn asset_counts(table: &PriceTable) -> HashMap<String, usize> {
    table.iter().map(|s| (s.asset.clone(), s.len())).collect()
}
