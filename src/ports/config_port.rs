//! Configuration access port trait.
//!
//! Values are addressed by INI-style `[section] key` and come back raw.
//! Parsing and range checks live in `domain::config_validation`.

use std::path::PathBuf;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Non-empty string value as a path.
    fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_string(section, key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
