//! Domain error types.

/// Top-level error type for tradetree.
#[derive(Debug, thiserror::Error)]
pub enum TradeTreeError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data: have {len} ticks, need {minimum}")]
    InsufficientData { len: usize, minimum: usize },

    #[error("unknown asset {name}")]
    UnknownAsset { name: String },

    #[error("tick {tick} is outside the series (length {len})")]
    TickOutOfRange { tick: usize, len: usize },

    #[error("strategy tree exceeded the node budget of {limit}")]
    NodeBudgetExceeded { limit: usize },

    #[error("failed to load {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradeTreeError> for std::process::ExitCode {
    fn from(err: &TradeTreeError) -> Self {
        let code: u8 = match err {
            TradeTreeError::Io(_) | TradeTreeError::Json(_) => 1,
            TradeTreeError::ConfigParse { .. }
            | TradeTreeError::ConfigMissing { .. }
            | TradeTreeError::ConfigInvalid { .. } => 2,
            TradeTreeError::Load { .. } => 3,
            TradeTreeError::Data { .. }
            | TradeTreeError::InsufficientData { .. }
            | TradeTreeError::UnknownAsset { .. } => 5,
            TradeTreeError::TickOutOfRange { .. } | TradeTreeError::NodeBudgetExceeded { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
