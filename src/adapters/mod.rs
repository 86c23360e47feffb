//! Concrete adapter implementations for ports.

pub mod csv_tick_adapter;
pub mod file_config_adapter;
pub mod json_tick_adapter;
pub mod svg_chart_adapter;

use std::path::Path;

use crate::adapters::csv_tick_adapter::CsvTickAdapter;
use crate::adapters::json_tick_adapter::JsonTickAdapter;
use crate::ports::tick_data_port::TickDataPort;

/// Pick a tick reader by file extension: `.csv` reads CSV, anything else JSON.
pub fn open_tick_source(path: &Path) -> Box<dyn TickDataPort> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvTickAdapter::new(path.to_path_buf()))
    } else {
        Box::new(JsonTickAdapter::new(path.to_path_buf()))
    }
}
