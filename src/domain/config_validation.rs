//! Configuration validation.
//!
//! Validates every analysis setting before any tick data is loaded. The
//! `read_*` helpers are shared with the CLI so a value is parsed the same
//! way whether it is being validated or used.

use crate::domain::error::TradeTreeError;
use crate::domain::strategy_tree::Variant;
use crate::domain::universe::parse_assets;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), TradeTreeError> {
    validate_input(config)?;
    read_assets(config)?;
    read_variant(config)?;
    read_initial_money(config)?;
    read_max_nodes(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TradeTreeError {
    TradeTreeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_input(config: &dyn ConfigPort) -> Result<(), TradeTreeError> {
    match config.get_path("data", "input") {
        Some(_) => Ok(()),
        None => Err(TradeTreeError::ConfigMissing {
            section: "data".to_string(),
            key: "input".to_string(),
        }),
    }
}

/// `[data] assets`, or `None` when absent.
pub fn read_assets(config: &dyn ConfigPort) -> Result<Option<Vec<String>>, TradeTreeError> {
    config
        .get_string("data", "assets")
        .map(|s| parse_assets(&s).map_err(|e| invalid("data", "assets", e.to_string())))
        .transpose()
}

pub fn read_variant(config: &dyn ConfigPort) -> Result<Option<Variant>, TradeTreeError> {
    config
        .get_string("analysis", "variant")
        .map(|s| {
            s.parse::<Variant>()
                .map_err(|reason| invalid("analysis", "variant", reason))
        })
        .transpose()
}

/// `[analysis] initial_money`; must be finite and positive.
pub fn read_initial_money(config: &dyn ConfigPort) -> Result<Option<f64>, TradeTreeError> {
    let Some(raw) = config.get_string("analysis", "initial_money") else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
        Ok(_) => Err(invalid(
            "analysis",
            "initial_money",
            "initial_money must be positive",
        )),
        Err(_) => Err(invalid(
            "analysis",
            "initial_money",
            "initial_money must be a number",
        )),
    }
}

/// `[analysis] max_nodes`; at least 1.
pub fn read_max_nodes(config: &dyn ConfigPort) -> Result<Option<usize>, TradeTreeError> {
    let Some(raw) = config.get_string("analysis", "max_nodes") else {
        return Ok(None);
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(invalid(
            "analysis",
            "max_nodes",
            "max_nodes must be a positive integer",
        )),
    }
}
