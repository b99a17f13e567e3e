//! Validation of configuration file contents.

use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Checks a config file for fields the watcher does not recognize
pub struct ConfigValidator {
    /// Set of valid configuration fields
    known_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "watch.extension",
            "watch.interval",
            "watch.error_backoff",
            "watch.start_position",
        ]
        .into_iter()
        .collect();

        Self { known_fields }
    }

    /// Logs a warning for every unknown field in `content`.
    ///
    /// Unparseable content is ignored here; the caller reports parse errors.
    pub fn warn_unknown_fields(&self, content: &str, config_path: &Path) {
        for field in self.unknown_fields(content) {
            warn!(
                field = %field,
                config = %config_path.display(),
                "unknown configuration field has no effect"
            );
        }
    }

    /// Returns the dotted paths of all unknown leaf fields in `content`.
    #[must_use]
    pub fn unknown_fields(&self, content: &str) -> Vec<String> {
        let Ok(parsed) = toml::from_str::<toml::Value>(content) else {
            return Vec::new();
        };
        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        unknown.sort();
        unknown
    }

    /// Recursively checks a TOML table for unknown fields
    ///
    /// # Arguments
    ///
    /// * `table` - The TOML value to validate (expected to be a table)
    /// * `prefix` - The current path prefix (e.g., "watch")
    /// * `unknown` - Vector to collect unknown field paths
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        if let toml::Value::Table(map) = table {
            for (key, value) in map {
                let full_key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };

                if self.known_fields.contains(full_key.as_str()) {
                    continue;
                }

                if let toml::Value::Table(_) = value {
                    self.check_table(value, &full_key, unknown);
                } else {
                    unknown.push(full_key);
                }
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields_pass() {
        let validator = ConfigValidator::new();
        let content = "[watch]\nextension = \".log\"\ninterval = 2.0\nerror_backoff = 1.0\nstart_position = \"end\"\n";
        assert!(validator.unknown_fields(content).is_empty());
    }

    #[test]
    fn test_unknown_fields_reported() {
        let validator = ConfigValidator::new();
        let content = "verbose = true\n[watch]\nintervall = 2.0\n[extra]\nkey = 1\n";
        assert_eq!(
            validator.unknown_fields(content),
            vec!["extra.key", "verbose", "watch.intervall"]
        );
    }

    #[test]
    fn test_invalid_toml_ignored() {
        let validator = ConfigValidator::new();
        assert!(validator.unknown_fields("[watch\n").is_empty());
    }
}
