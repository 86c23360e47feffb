//! Core domain types and logic.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod outcome;
pub mod portfolio;
pub mod price_table;
pub mod signal;
pub mod strategy_tree;
pub mod tick;
pub mod trend;
pub mod universe;
