//! Per-asset analysis pipeline: trend, signals, strategy tree, outcomes.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use tracing::info;

use crate::domain::error::TradeTreeError;
use crate::domain::outcome::{best_path, summarize, BestPath, TreeSummary};
use crate::domain::portfolio::PortfolioState;
use crate::domain::price_table::PriceTable;
use crate::domain::signal::{extract_signals, SignalSet};
use crate::domain::strategy_tree::{build_strategy_tree, StrategyTree, TreeConfig, Variant};
use crate::domain::tick::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub initial_money: f64,
    pub tree: TreeConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            initial_money: 1.0,
            tree: TreeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetAnalysis {
    #[serde(skip)]
    pub asset: String,
    pub buy_times: Vec<usize>,
    pub sell_times: Vec<usize>,
    pub summary: TreeSummary,
    pub best_path: Option<BestPath>,
    #[serde(serialize_with = "serialize_tree_root")]
    pub tree: StrategyTree,
}

fn serialize_tree_root<S: Serializer>(tree: &StrategyTree, serializer: S) -> Result<S::Ok, S::Error> {
    tree.root.serialize(serializer)
}

impl AssetAnalysis {
    pub fn signals(&self) -> SignalSet {
        SignalSet {
            buy_times: self.buy_times.clone(),
            sell_times: self.sell_times.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub variant: Variant,
    pub initial_money: f64,
    pub assets: BTreeMap<String, AssetAnalysis>,
}

pub fn analyze_series(
    series: &PriceSeries,
    config: &AnalysisConfig,
) -> Result<AssetAnalysis, TradeTreeError> {
    let signals = extract_signals(series)?;
    let tree = build_strategy_tree(
        series,
        &signals,
        PortfolioState::initial(config.initial_money),
        &config.tree,
    )?;
    let summary = summarize(&tree);
    let best = best_path(&tree);

    info!(
        asset = %series.asset,
        buys = signals.buy_times.len(),
        sells = signals.sell_times.len(),
        nodes = summary.nodes,
        leaves = summary.leaves,
        best_money = ?best.as_ref().map(|b| b.final_money),
        "analyzed asset"
    );

    Ok(AssetAnalysis {
        asset: series.asset.clone(),
        buy_times: signals.buy_times,
        sell_times: signals.sell_times,
        summary,
        best_path: best,
        tree,
    })
}

/// Analyze every named asset. The first failing asset aborts the run.
pub fn analyze_table(
    table: &PriceTable,
    assets: &[String],
    config: &AnalysisConfig,
    generated_at: String,
) -> Result<AnalysisReport, TradeTreeError> {
    let mut results = BTreeMap::new();
    for name in assets {
        let analysis = analyze_series(table.series(name)?, config)?;
        results.insert(name.clone(), analysis);
    }
    Ok(AnalysisReport {
        generated_at,
        variant: config.tree.variant,
        initial_money: config.initial_money,
        assets: results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_table::TickRecord;

    fn scenario_table() -> PriceTable {
        PriceTable::from_records(
            "test",
            vec![
                TickRecord {
                    name: "TEST".into(),
                    ticks: vec![[10.0, 11.0], [12.0, 13.0], [9.0, 10.0], [14.0, 15.0], [8.0, 9.0]],
                },
                TickRecord {
                    name: "FLAT".into(),
                    ticks: vec![[1.0, 1.1], [1.0, 1.1], [1.0, 1.1]],
                },
            ],
        )
        .unwrap()
    }

    fn config(initial_money: f64) -> AnalysisConfig {
        AnalysisConfig {
            initial_money,
            tree: TreeConfig {
                variant: Variant::Exhaustive,
                max_nodes: None,
            },
        }
    }

    #[test]
    fn default_config() {
        let c = AnalysisConfig::default();
        assert!((c.initial_money - 1.0).abs() < f64::EPSILON);
        assert_eq!(c.tree.variant, Variant::Pruned);
        assert_eq!(c.tree.max_nodes, None);
    }

    #[test]
    fn analyze_series_scenario() {
        let table = scenario_table();
        let analysis = analyze_series(table.series("TEST").unwrap(), &config(100.0)).unwrap();
        assert_eq!(analysis.buy_times, vec![0, 2]);
        assert_eq!(analysis.sell_times, vec![1, 3]);
        assert_eq!(analysis.summary.nodes, 8);
        assert_eq!(analysis.best_path.unwrap().final_money, 149.0);
    }

    #[test]
    fn analyze_table_collects_assets() {
        let table = scenario_table();
        let report = analyze_table(
            &table,
            &["TEST".to_string()],
            &config(100.0),
            "2024-01-01T00:00:00+00:00".into(),
        )
        .unwrap();
        assert_eq!(report.variant, Variant::Exhaustive);
        assert_eq!(report.assets.len(), 1);
        assert!(report.assets.contains_key("TEST"));
    }

    #[test]
    fn analyze_table_propagates_flat_series() {
        let table = scenario_table();
        let err = analyze_table(
            &table,
            &["TEST".to_string(), "FLAT".to_string()],
            &config(1.0),
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TradeTreeError::Data { .. }));
    }

    #[test]
    fn report_serializes_tree_as_nested_mapping() {
        let table = scenario_table();
        let report = analyze_table(&table, &["TEST".to_string()], &config(100.0), "now".into())
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["variant"], "exhaustive");
        assert_eq!(json["generated_at"], "now");
        let asset = &json["assets"]["TEST"];
        assert_eq!(asset["buy_times"], serde_json::json!([0, 2]));
        assert_eq!(asset["tree"]["money"], 100.0);
        assert_eq!(asset["tree"]["0"]["asset"], 9);
        assert_eq!(asset["tree"]["0"]["1"]["money"], 109.0);
        assert_eq!(asset["summary"]["nodes"], 8);
        assert_eq!(asset["best_path"]["decisions"][0]["action"], "buy");
        assert!(asset.get("asset").is_none());
    }
}
