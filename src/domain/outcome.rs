//! Outcome analysis over a finished strategy tree.

use serde::Serialize;

use crate::domain::portfolio::PortfolioState;
use crate::domain::strategy_tree::{StrategyNode, StrategyTree};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeSummary {
    pub nodes: usize,
    pub leaves: usize,
    /// Decisions on the longest root-to-leaf path.
    pub max_depth: usize,
    pub cash_leaves: usize,
    pub position_leaves: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub tick: usize,
    pub action: Action,
    /// Ask paid for a buy, bid received for a sell.
    pub price: f64,
    pub state_after: PortfolioState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestPath {
    pub final_money: f64,
    pub decisions: Vec<Decision>,
}

pub fn summarize(tree: &StrategyTree) -> TreeSummary {
    let mut summary = TreeSummary::default();
    visit_summary(&tree.root, 0, &mut summary);
    summary
}

fn visit_summary(node: &StrategyNode, depth: usize, summary: &mut TreeSummary) {
    summary.nodes += 1;
    summary.max_depth = summary.max_depth.max(depth);
    if node.is_leaf() {
        summary.leaves += 1;
        if node.state.is_cash() {
            summary.cash_leaves += 1;
        } else {
            summary.position_leaves += 1;
        }
    }
    for (_, child) in &node.children {
        visit_summary(child, depth + 1, summary);
    }
}

/// Money of every cash node, in pre-order.
pub fn reachable_cash(node: &StrategyNode) -> Vec<f64> {
    let mut out = Vec::new();
    collect_cash(node, &mut out);
    out
}

fn collect_cash(node: &StrategyNode, out: &mut Vec<f64>) {
    if let Some(money) = node.state.money() {
        out.push(money);
    }
    for (_, child) in &node.children {
        collect_cash(child, out);
    }
}

fn decision(tick: usize, state_after: PortfolioState) -> Decision {
    match state_after {
        PortfolioState::Position { paid_price, .. } => Decision {
            tick,
            action: Action::Buy,
            price: paid_price,
            state_after,
        },
        PortfolioState::Cash {
            best_sale_price, ..
        } => Decision {
            tick,
            action: Action::Sell,
            price: best_sale_price,
            state_after,
        },
    }
}

/// Path to the cash node holding the most money. Ties go to the node met
/// first in pre-order, so doing nothing wins over trades that only break
/// even. `None` when the tree has no cash node.
pub fn best_path(tree: &StrategyTree) -> Option<BestPath> {
    let mut path = Vec::new();
    let mut best = None;
    search_best(&tree.root, &mut path, &mut best);
    best
}

fn search_best(node: &StrategyNode, path: &mut Vec<Decision>, best: &mut Option<BestPath>) {
    if let Some(money) = node.state.money() {
        let better = best.as_ref().is_none_or(|b| money > b.final_money);
        if better {
            *best = Some(BestPath {
                final_money: money,
                decisions: path.clone(),
            });
        }
    }
    for (tick, child) in &node.children {
        path.push(decision(*tick, child.state));
        search_best(child, path, best);
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::SignalSet;
    use crate::domain::strategy_tree::build_exhaustive;
    use crate::domain::tick::PriceSeries;

    fn scenario_tree() -> StrategyTree {
        let series = PriceSeries::from_quotes(
            "TEST",
            &[(10.0, 11.0), (12.0, 13.0), (9.0, 10.0), (14.0, 15.0), (8.0, 9.0)],
        );
        let signals = SignalSet {
            buy_times: vec![0, 2],
            sell_times: vec![1, 3],
        };
        build_exhaustive(&series, &signals, PortfolioState::initial(100.0)).unwrap()
    }

    #[test]
    fn summary_counts() {
        let tree = scenario_tree();
        let summary = summarize(&tree);
        assert_eq!(
            summary,
            TreeSummary {
                nodes: 8,
                leaves: 3,
                max_depth: 4,
                cash_leaves: 3,
                position_leaves: 0,
            }
        );
        assert_eq!(summary.nodes, tree.node_count);
    }

    #[test]
    fn reachable_cash_in_preorder() {
        let tree = scenario_tree();
        assert_eq!(
            reachable_cash(&tree.root),
            vec![100.0, 109.0, 149.0, 127.0, 140.0]
        );
    }

    #[test]
    fn best_path_follows_highest_cash() {
        let best = best_path(&scenario_tree()).unwrap();
        assert_eq!(best.final_money, 149.0);
        let steps: Vec<(usize, Action, f64)> = best
            .decisions
            .iter()
            .map(|d| (d.tick, d.action, d.price))
            .collect();
        assert_eq!(
            steps,
            vec![
                (0, Action::Buy, 11.0),
                (1, Action::Sell, 12.0),
                (2, Action::Buy, 10.0),
                (3, Action::Sell, 14.0),
            ]
        );
    }

    #[test]
    fn best_path_of_leaf_root_is_empty() {
        let series = PriceSeries::from_quotes("T", &[(1.0, 1.1), (2.0, 2.1)]);
        let tree =
            build_exhaustive(&series, &SignalSet::default(), PortfolioState::initial(5.0)).unwrap();
        let best = best_path(&tree).unwrap();
        assert_eq!(best.final_money, 5.0);
        assert!(best.decisions.is_empty());
    }

    #[test]
    fn position_leaves_counted() {
        let series = PriceSeries::from_quotes("T", &[(1.0, 1.1), (2.0, 2.1)]);
        let signals = SignalSet {
            buy_times: vec![1],
            sell_times: vec![],
        };
        let tree = build_exhaustive(&series, &signals, PortfolioState::initial(5.0)).unwrap();
        let summary = summarize(&tree);
        assert_eq!(summary.position_leaves, 1);
        assert_eq!(summary.cash_leaves, 0);
        assert_eq!(summary.max_depth, 1);
    }
}
