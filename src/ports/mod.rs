//! Port traits between the analysis core and its collaborators.

pub mod chart_port;
pub mod config_port;
pub mod tick_data_port;
