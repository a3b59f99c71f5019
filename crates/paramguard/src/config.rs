//! Drift analysis settings.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParamguardError, Result};

/// Settings for one drift analysis run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Parameters ignored entirely (high-cardinality ids, raw timestamps).
    pub exclude: BTreeSet<String>,

    /// Maximum example values kept per changed parameter.
    pub sample_limit: usize,

    /// Fully-qualified warehouse table holding the event rows.
    pub table: String,

    /// Column holding the app version.
    pub version_column: String,

    /// Column holding the event date.
    pub date_column: String,

    /// Confirm candidates against the warehouse before reporting them.
    pub confirm: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            exclude: BTreeSet::new(),
            sample_limit: 3,
            table: "analytics.events".to_string(),
            version_column: "app_version".to_string(),
            date_column: "event_date".to_string(),
            confirm: true,
        }
    }
}

impl DriftConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ParamguardError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: DriftConfig = serde_json::from_reader(BufReader::new(file))?;
        config.check()?;
        Ok(config)
    }

    /// Add parameters to the exclusion set.
    pub fn with_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// At least one sample is always kept.
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit.max(1);
        self
    }

    /// Skip the warehouse confirmation step.
    pub fn without_confirmation(mut self) -> Self {
        self.confirm = false;
        self
    }

    fn check(&self) -> Result<()> {
        if self.sample_limit == 0 {
            return Err(ParamguardError::Config("sample_limit must be at least 1".to_string()));
        }
        if self.table.trim().is_empty() {
            return Err(ParamguardError::Config("table must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = DriftConfig::default();
        assert_eq!(config.sample_limit, 3);
        assert!(config.confirm);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"exclude": ["user_id", "event_timestamp"], "table": "prod.game_events"}}"#
        )
        .unwrap();

        let config = DriftConfig::load(file.path()).unwrap();
        assert_eq!(config.table, "prod.game_events");
        assert!(config.exclude.contains("user_id"));
        assert_eq!(config.version_column, "app_version");
        assert_eq!(config.sample_limit, 3);
    }

    #[test]
    fn test_sample_limit_floor() {
        assert_eq!(DriftConfig::default().with_sample_limit(0).sample_limit, 1);
        assert_eq!(DriftConfig::default().with_sample_limit(7).sample_limit, 7);
    }

    #[test]
    fn test_load_rejects_zero_samples() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"sample_limit": 0}}"#).unwrap();
        assert!(matches!(DriftConfig::load(file.path()), Err(ParamguardError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = DriftConfig::load("/nonexistent/paramguard.json");
        assert!(matches!(result, Err(ParamguardError::Io { .. })));
    }

    #[test]
    fn test_builders() {
        let config = DriftConfig::new()
            .with_exclusions(["a", "b"])
            .with_table("t")
            .with_sample_limit(5)
            .without_confirmation();
        assert_eq!(config.exclude.len(), 2);
        assert_eq!(config.table, "t");
        assert_eq!(config.sample_limit, 5);
        assert!(!config.confirm);
    }
}
