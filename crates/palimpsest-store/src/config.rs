//! History configuration.

use serde::{Deserialize, Serialize};

/// Configuration for history tracking and storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether history tracking is enabled.
    pub enabled: bool,

    /// Maximum age of snapshots in days. Carried for retention tooling;
    /// enforcement lives outside the store.
    pub max_age_days: u32,

    /// Maximum total storage size in MB. Carried for retention tooling;
    /// enforcement lives outside the store.
    pub max_size_mb: u32,

    /// Whether selection-history filtering is offered.
    pub track_selection_history: bool,

    /// Wildcard patterns for scope-relative paths to exclude from tracking.
    pub exclude: Vec<String>,

    /// Store history under the project root (`.palimpsest/`) instead of the
    /// global per-install directory.
    pub save_in_project: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_days: 30,
            max_size_mb: 500,
            track_selection_history: true,
            exclude: Vec::new(),
            save_in_project: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HistoryConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_age_days, 30);
        assert!(!config.save_in_project);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: HistoryConfig =
            serde_json::from_str(r#"{"save_in_project": true, "exclude": ["*.lock"]}"#).unwrap();
        assert!(config.save_in_project);
        assert_eq!(config.exclude, vec!["*.lock".to_string()]);
        assert!(config.enabled);
        assert_eq!(config.max_size_mb, 500);
    }
}
