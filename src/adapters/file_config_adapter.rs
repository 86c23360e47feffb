//! INI file configuration adapter.

use crate::domain::error::TradeTreeError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradeTreeError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TradeTreeError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TradeTreeError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| TradeTreeError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
input = ticks.json
assets = EURUSD,GBPUSD

[analysis]
variant = pruned
initial_money = 1.0
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "input"),
            Some("ticks.json".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "assets"),
            Some("EURUSD,GBPUSD".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\ninput = t.json\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn values_come_back_raw() {
        let adapter = FileConfigAdapter::from_string(
            "[analysis]\ninitial_money = plenty\nmax_nodes = 12\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_string("analysis", "initial_money"),
            Some("plenty".to_string())
        );
        assert_eq!(
            adapter.get_string("analysis", "max_nodes"),
            Some("12".to_string())
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Data]
Input = t.json
").unwrap();
        assert_eq!(adapter.get_string("data", "input"), Some("t.json".to_string()));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[output]\nchart_dir = /tmp/plots\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("output", "chart_dir"),
            Some("/tmp/plots".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(
            matches!(err, TradeTreeError::ConfigParse { ref file, .. } if file == "/nonexistent/path/config.ini")
        );
    }

    #[test]
    fn get_path_skips_blank_values() {
        let adapter =
            FileConfigAdapter::from_string("[output]\nreport = out/report.json\nchart_dir =\n")
                .unwrap();
        assert_eq!(
            adapter.get_path("output", "report"),
            Some(std::path::PathBuf::from("out/report.json"))
        );
        assert_eq!(adapter.get_path("output", "chart_dir"), None);
        assert_eq!(adapter.get_path("output", "missing"), None);
    }
}
