//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::LinterError;
use crate::rule_loader::BUILTIN_GROUP;

/// Configuration file names, in lookup priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".lintel.jsonc", ".lintel.json"];

/// Default maximum file size (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// One configuration file as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Stop looking for configuration in parent directories.
    #[serde(default)]
    pub root: bool,

    /// Rule selectors to enable.
    #[serde(default)]
    pub enable: Vec<String>,

    /// Rule selectors to disable.
    #[serde(default)]
    pub disable: Vec<String>,

    /// Rule options keyed by rule name.
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,

    /// Whether `lintel-ignore` comments are honored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_suppressions: Option<bool>,
}

impl ConfigFile {
    /// Loads configuration from a file.
    ///
    /// Supports `.lintel.jsonc`, `.lintel.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_jsonc(&content)
            .map_err(|e| LinterError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parses configuration from JSON with comments.
    pub fn from_jsonc(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }
}

/// The effective, immutable configuration for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// The file this configuration applies to.
    pub path: PathBuf,

    pub enable: Vec<String>,

    pub disable: Vec<String>,

    pub options: BTreeMap<String, serde_json::Value>,

    pub allow_suppressions: bool,

    /// Configuration files applied, outermost first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Default configuration: every built-in rule, suppressions allowed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enable: vec![BUILTIN_GROUP.to_string()],
            disable: Vec::new(),
            options: BTreeMap::new(),
            allow_suppressions: true,
            sources: Vec::new(),
        }
    }

    /// Applies one configuration file on top of this one.
    ///
    /// Enabling a selector removes it from the disabled list and vice versa,
    /// so inner files can override outer ones in both directions.
    pub fn merge(&mut self, file: &ConfigFile, source: Option<&Path>) {
        for selector in &file.enable {
            self.disable.retain(|s| s != selector);
            if !self.enable.contains(selector) {
                self.enable.push(selector.clone());
            }
        }
        for selector in &file.disable {
            self.enable.retain(|s| s != selector);
            if !self.disable.contains(selector) {
                self.disable.push(selector.clone());
            }
        }
        for (rule, options) in &file.options {
            self.options.insert(rule.clone(), options.clone());
        }
        if let Some(allow) = file.allow_suppressions {
            self.allow_suppressions = allow;
        }
        if let Some(source) = source {
            self.sources.push(source.to_path_buf());
        }
    }

    /// Returns a copy of this configuration for a different file.
    pub fn for_path(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self.clone()
        }
    }
}

/// Run-level options for a [`Linter`](crate::Linter).
#[derive(Debug, Clone)]
pub struct LinterOptions {
    /// Worker threads for multi-file runs. 0 uses all available CPUs.
    pub jobs: usize,

    /// Files larger than this produce an error result instead of being read.
    pub max_file_size: u64,
}

impl Default for LinterOptions {
    fn default() -> Self {
        Self {
            jobs: 0,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::new("a.txt");
        assert_eq!(config.enable, vec!["builtin"]);
        assert!(config.disable.is_empty());
        assert!(config.allow_suppressions);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_config_file_from_jsonc_with_comments() {
        let json = r#"{
            // keep the tree tidy
            "enable": ["no-todo"],
            "disable": ["max-line-length"], /* noisy */
            "options": { "no-todo": { "case_sensitive": true } }
        }"#;
        let file = ConfigFile::from_jsonc(json).unwrap();
        assert!(!file.root);
        assert_eq!(file.enable, vec!["no-todo"]);
        assert_eq!(file.disable, vec!["max-line-length"]);
        assert_eq!(file.options["no-todo"]["case_sensitive"], true);
        assert_eq!(file.allow_suppressions, None);
    }

    #[test]
    fn test_config_file_empty_document() {
        let file = ConfigFile::from_jsonc("").unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn test_config_file_rejects_unknown_fields() {
        let err = ConfigFile::from_jsonc(r#"{ "rules": [] }"#).unwrap_err();
        assert!(matches!(err, LinterError::Config(_)));
    }

    #[test]
    fn test_config_file_rejects_invalid_json() {
        let err = ConfigFile::from_jsonc("{ invalid }").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_config_file_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "root": true, "allow_suppressions": false }}"#).unwrap();

        let config = ConfigFile::from_file(file.path()).unwrap();
        assert!(config.root);
        assert_eq!(config.allow_suppressions, Some(false));
    }

    #[test]
    fn test_config_file_missing_is_config_error() {
        let err = ConfigFile::from_file("/nonexistent/.lintel.json").unwrap_err();
        assert!(matches!(err, LinterError::Config(_)));
    }

    #[test]
    fn test_merge_enable_and_disable_override_each_other() {
        let mut config = Config::new("a.txt");
        config.merge(
            &ConfigFile {
                disable: vec!["no-todo".into()],
                ..Default::default()
            },
            Some(Path::new("/outer/.lintel.json")),
        );
        assert_eq!(config.disable, vec!["no-todo"]);

        config.merge(
            &ConfigFile {
                enable: vec!["no-todo".into()],
                disable: vec!["builtin".into()],
                ..Default::default()
            },
            Some(Path::new("/outer/inner/.lintel.json")),
        );
        assert_eq!(config.enable, vec!["no-todo"]);
        assert_eq!(config.disable, vec!["builtin"]);
        assert_eq!(
            config.sources,
            vec![
                PathBuf::from("/outer/.lintel.json"),
                PathBuf::from("/outer/inner/.lintel.json")
            ]
        );
    }

    #[test]
    fn test_merge_options_replace_per_rule() {
        let mut config = Config::new("a.txt");
        let mut outer = ConfigFile::default();
        outer
            .options
            .insert("max-line-length".into(), serde_json::json!({ "max": 80 }));
        outer
            .options
            .insert("no-todo".into(), serde_json::json!({ "patterns": ["HACK"] }));
        config.merge(&outer, None);

        let mut inner = ConfigFile::default();
        inner
            .options
            .insert("max-line-length".into(), serde_json::json!({ "max": 120 }));
        config.merge(&inner, None);

        assert_eq!(config.options["max-line-length"]["max"], 120);
        assert_eq!(config.options["no-todo"]["patterns"][0], "HACK");
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_for_path_keeps_settings() {
        let mut config = Config::new("a.txt");
        config.allow_suppressions = false;
        let other = config.for_path("b.txt");
        assert_eq!(other.path, PathBuf::from("b.txt"));
        assert!(!other.allow_suppressions);
    }

    #[test]
    fn test_linter_options_default() {
        let options = LinterOptions::default();
        assert_eq!(options.jobs, 0);
        assert_eq!(options.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }
}
