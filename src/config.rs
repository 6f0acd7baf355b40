//! Configuration management for docsnip
//!
//! Settings load from environment variables with sensible defaults and can be
//! overlaid with a TOML file. The placeholder profile carries every literal the
//! rewrite rules look for, so the rules themselves hold no constants.
//!
//! # Environment Variables
//!
//! - `DOCSNIP_DOCS_ROOT`: Documentation corpus root - default: "."
//! - `DOCSNIP_OUTPUT_DIR`: Where generated modules go - default: "<docs root>/tests/generated"
//! - `DOCSNIP_LANGUAGE`: Fenced-code language tag to extract - default: "python"
//! - `DOCSNIP_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use docsnip::SnippetConfig;
//!
//! let config = SnippetConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::model::SecretClass;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_LANGUAGE: &str = "python";
const DEFAULT_EXTENSION: &str = "mdx";
const DEFAULT_SUBTREE: &str = "v3";
const DEFAULT_SKIP_MARKER: &str = r"\{/\*\s*skip-test\s*\*/\}";
const DEFAULT_LOOKBACK_SEGMENTS: usize = 3;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_OUTPUT_SUBDIR: &str = "tests/generated";

const PRODUCTION_DOCUMENTS: [&str; 4] = [
    "v3/how-to/cost-management/monitor-usage.mdx",
    "v3/how-to/user-management/manage-tokens.mdx",
    "v3/tutorials/multi-environment-tokens.mdx",
    "v3/tutorials/track-optimize-spending.mdx",
];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Skip marker is not a valid regular expression
    #[error("Invalid skip marker pattern: {0}")]
    InvalidSkipMarker(#[from] regex::Error),

    /// Config file could not be read
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Placeholder literals and the runtime names they are rewritten to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceholderProfile {
    /// Secret variable referenced by sandbox documents
    pub sandbox_token_var: String,
    /// Secret variable referenced by production documents
    pub production_token_var: String,
    /// Corpus-relative documents that need the production secret
    pub production_documents: BTreeSet<String>,
    /// Equivalent spellings of the fake API key
    pub key_placeholders: Vec<String>,
    /// Variable name the docs read with `os.getenv(...)`
    pub legacy_key_env_var: String,
    /// Identifier the docs bind the key to
    pub key_variable: String,
    pub placeholder_resource_id: String,
    pub resource_id_binding: String,
    pub resource_id_env_var: String,
    pub placeholder_host: String,
    pub base_url_binding: String,
    pub base_url_env_var: String,
    pub default_base_url: String,
}

impl Default for PlaceholderProfile {
    fn default() -> Self {
        Self {
            sandbox_token_var: "EDEN_AI_SANDBOX_API_TOKEN".to_string(),
            production_token_var: "EDEN_AI_PRODUCTION_API_TOKEN".to_string(),
            production_documents: PRODUCTION_DOCUMENTS.iter().map(|s| s.to_string()).collect(),
            key_placeholders: vec!["YOUR_API_KEY".to_string(), "YOUR_EDEN_AI_API_KEY".to_string()],
            legacy_key_env_var: "EDEN_AI_API_KEY".to_string(),
            key_variable: "API_KEY".to_string(),
            placeholder_resource_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            resource_id_binding: "_EDEN_TEST_FILE_ID".to_string(),
            resource_id_env_var: "_EDEN_TEST_FILE_ID".to_string(),
            placeholder_host: "https://api.edenai.run".to_string(),
            base_url_binding: "_EDEN_BASE_URL".to_string(),
            base_url_env_var: "EDEN_AI_BASE_URL".to_string(),
            default_base_url: "https://api.edenai.run".to_string(),
        }
    }
}

impl PlaceholderProfile {
    /// Classifies a document by exact corpus-relative path
    pub fn secret_class_for(&self, source: &str) -> SecretClass {
        if self.production_documents.contains(source) {
            SecretClass::Production
        } else {
            SecretClass::Sandbox
        }
    }

    /// Secret variable name the given class resolves to
    pub fn token_var(&self, class: SecretClass) -> &str {
        match class {
            SecretClass::Sandbox => &self.sandbox_token_var,
            SecretClass::Production => &self.production_token_var,
        }
    }
}

/// Main configuration structure for docsnip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetConfig {
    /// Root of the documentation corpus
    pub docs_root: PathBuf,

    /// Directory receiving generated modules
    pub output_dir: PathBuf,

    /// Fenced-code language tag to extract
    pub language: String,

    /// Document file extension, without the dot
    pub extension: String,

    /// Subtree searched recursively, relative to `docs_root`
    pub subtree: PathBuf,

    /// Regex source of the annotation that excludes the next block
    pub skip_marker: String,

    /// Newline-delimited segments before a fence searched for the skip marker
    pub lookback_segments: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub profile: PlaceholderProfile,
}

impl SnippetConfig {
    /// Built-in defaults for a corpus at `docs_root`, ignoring the environment
    pub fn new(docs_root: PathBuf) -> Self {
        Self {
            output_dir: docs_root.join(DEFAULT_OUTPUT_SUBDIR),
            docs_root,
            language: DEFAULT_LANGUAGE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            subtree: PathBuf::from(DEFAULT_SUBTREE),
            skip_marker: DEFAULT_SKIP_MARKER.to_string(),
            lookback_segments: DEFAULT_LOOKBACK_SEGMENTS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            profile: PlaceholderProfile::default(),
        }
    }

    /// Loads DOCSNIP_* environment variables on top of the built-in defaults
    pub fn from_env() -> Self {
        let docs_root = env::var("DOCSNIP_DOCS_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let mut config = Self::new(docs_root);

        if let Ok(dir) = env::var("DOCSNIP_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(language) = env::var("DOCSNIP_LANGUAGE") {
            config.language = language;
        }
        if let Ok(level) = env::var("DOCSNIP_LOG_LEVEL") {
            config.log_level = level.to_lowercase();
        }

        config
    }
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// On-disk overlay; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    docs_root: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    language: Option<String>,
    extension: Option<String>,
    subtree: Option<PathBuf>,
    skip_marker: Option<String>,
    lookback_segments: Option<usize>,
    log_level: Option<String>,
    #[serde(default)]
    profile: BTreeMap<String, toml::Value>,
}

impl SnippetConfig {
    /// Environment defaults overlaid with the TOML file at `path`.
    ///
    /// Relative `docs_root`/`output_dir` values resolve against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::default().overlay_toml(&raw, base).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn overlay_toml(mut self, raw: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(raw)?;

        if let Some(root) = file.docs_root {
            self = self.with_docs_root(base.join(root));
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = base.join(dir);
        }
        if let Some(language) = file.language {
            self.language = language;
        }
        if let Some(extension) = file.extension {
            self.extension = extension;
        }
        if let Some(subtree) = file.subtree {
            self.subtree = subtree;
        }
        if let Some(marker) = file.skip_marker {
            self.skip_marker = marker;
        }
        if let Some(segments) = file.lookback_segments {
            self.lookback_segments = segments;
        }
        if let Some(level) = file.log_level {
            self.log_level = level.to_lowercase();
        }

        if !file.profile.is_empty() {
            // Merge key by key so a partial [profile] table keeps the remaining defaults.
            let mut merged = toml::Value::try_from(&self.profile)
                .map_err(|e| <toml::de::Error as serde::de::Error>::custom(e.to_string()))?;
            if let toml::Value::Table(table) = &mut merged {
                table.extend(file.profile);
            }
            self.profile = merged.try_into()?;
        }

        Ok(self)
    }

    /// Sets the corpus root, moving the default output directory along with it
    pub fn with_docs_root(mut self, docs_root: PathBuf) -> Self {
        if self.output_dir == self.docs_root.join(DEFAULT_OUTPUT_SUBDIR) {
            self.output_dir = docs_root.join(DEFAULT_OUTPUT_SUBDIR);
        }
        self.docs_root = docs_root;
        self
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any validation fails
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Language tag must not be empty".to_string(),
            ));
        }
        if self.language.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationFailed(format!(
                "Language tag must be a single token, got '{}'",
                self.language
            )));
        }
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(ConfigError::ValidationFailed(
                "Extension must be non-empty and given without the leading dot".to_string(),
            ));
        }
        if self.lookback_segments == 0 {
            return Err(ConfigError::ValidationFailed(
                "Skip lookback must cover at least one segment".to_string(),
            ));
        }

        Regex::new(&self.skip_marker)?;

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        let profile = &self.profile;
        if profile.sandbox_token_var == profile.production_token_var {
            return Err(ConfigError::ValidationFailed(
                "Sandbox and production token variables must differ".to_string(),
            ));
        }
        if profile.key_placeholders.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "At least one API key placeholder is required".to_string(),
            ));
        }
        for (field, value) in [
            ("sandbox_token_var", &profile.sandbox_token_var),
            ("production_token_var", &profile.production_token_var),
            ("key_variable", &profile.key_variable),
            ("placeholder_resource_id", &profile.placeholder_resource_id),
            ("resource_id_binding", &profile.resource_id_binding),
            ("placeholder_host", &profile.placeholder_host),
            ("base_url_binding", &profile.base_url_binding),
        ] {
            if value.is_empty() {
                return Err(ConfigError::ValidationFailed(format!("{} must not be empty", field)));
            }
        }

        Ok(())
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();

        map.insert("docs_root".to_string(), self.docs_root.display().to_string());
        map.insert("output_dir".to_string(), self.output_dir.display().to_string());
        map.insert("language".to_string(), self.language.clone());
        map.insert("extension".to_string(), self.extension.clone());
        map.insert("subtree".to_string(), self.subtree.display().to_string());
        map.insert("skip_marker".to_string(), self.skip_marker.clone());
        map.insert(
            "lookback_segments".to_string(),
            self.lookback_segments.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert(
            "sandbox_token_var".to_string(),
            self.profile.sandbox_token_var.clone(),
        );
        map.insert(
            "production_token_var".to_string(),
            self.profile.production_token_var.clone(),
        );
        map.insert(
            "production_documents".to_string(),
            self.profile
                .production_documents
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        );
        map.insert(
            "default_base_url".to_string(),
            self.profile.default_base_url.clone(),
        );

        map
    }
}

impl fmt::Display for SnippetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Docsnip Configuration:")?;
        writeln!(f, "  Docs Root: {}", self.docs_root.display())?;
        writeln!(f, "  Output Dir: {}", self.output_dir.display())?;
        writeln!(f, "  Language: {}", self.language)?;
        writeln!(
            f,
            "  Documents: *.{} in {} (recursive) and the root",
            self.extension,
            self.subtree.display()
        )?;
        writeln!(f, "  Skip Marker: {}", self.skip_marker)?;
        writeln!(f, "  Sandbox Token: {}", self.profile.sandbox_token_var)?;
        writeln!(f, "  Production Token: {}", self.profile.production_token_var)?;
        writeln!(
            f,
            "  Production Documents: {}",
            self.profile.production_documents.len()
        )?;
        writeln!(f, "  Default Base URL: {}", self.profile.default_base_url)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clean_env() -> Vec<EnvGuard> {
        vec![
            EnvGuard::unset("DOCSNIP_DOCS_ROOT"),
            EnvGuard::unset("DOCSNIP_OUTPUT_DIR"),
            EnvGuard::unset("DOCSNIP_LANGUAGE"),
            EnvGuard::unset("DOCSNIP_LOG_LEVEL"),
        ]
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = clean_env();

        let config = SnippetConfig::default();

        assert_eq!(config.docs_root, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from("./tests/generated"));
        assert_eq!(config.language, DEFAULT_LANGUAGE);
        assert_eq!(config.extension, "mdx");
        assert_eq!(config.subtree, PathBuf::from("v3"));
        assert_eq!(config.lookback_segments, 3);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _clean = clean_env();
        let _guards = vec![
            EnvGuard::set("DOCSNIP_DOCS_ROOT", "/srv/docs"),
            EnvGuard::set("DOCSNIP_LANGUAGE", "py"),
            EnvGuard::set("DOCSNIP_LOG_LEVEL", "DEBUG"),
        ];

        let config = SnippetConfig::default();

        assert_eq!(config.docs_root, PathBuf::from("/srv/docs"));
        assert_eq!(config.output_dir, PathBuf::from("/srv/docs/tests/generated"));
        assert_eq!(config.language, "py");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_output_dir_env_wins() {
        let _clean = clean_env();
        let _guard = EnvGuard::set("DOCSNIP_OUTPUT_DIR", "/tmp/generated");

        let config = SnippetConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/generated"));
    }

    #[test]
    #[serial]
    fn test_with_docs_root_moves_default_output() {
        let _guards = clean_env();

        let config = SnippetConfig::default().with_docs_root(PathBuf::from("/docs"));
        assert_eq!(config.output_dir, PathBuf::from("/docs/tests/generated"));

        let config = SnippetConfig::default()
            .with_output_dir(PathBuf::from("/out"))
            .with_docs_root(PathBuf::from("/docs"));
        assert_eq!(config.output_dir, PathBuf::from("/out"));
    }

    #[test]
    fn test_secret_class_lookup() {
        let profile = PlaceholderProfile::default();

        assert_eq!(
            profile.secret_class_for("v3/tutorials/track-optimize-spending.mdx"),
            SecretClass::Production
        );
        assert_eq!(
            profile.secret_class_for("v3/tutorials/other.mdx"),
            SecretClass::Sandbox
        );
        // Exact match only
        assert_eq!(
            profile.secret_class_for("./v3/tutorials/track-optimize-spending.mdx"),
            SecretClass::Sandbox
        );
        assert_eq!(profile.token_var(SecretClass::Sandbox), "EDEN_AI_SANDBOX_API_TOKEN");
        assert_eq!(
            profile.token_var(SecretClass::Production),
            "EDEN_AI_PRODUCTION_API_TOKEN"
        );
    }

    #[test]
    #[serial]
    fn test_overlay_toml_partial_profile() {
        let _guards = clean_env();
        let raw = r#"
docs_root = "site"
language = "py"

[profile]
sandbox_token_var = "SANDBOX_TOKEN"
production_documents = ["billing.mdx"]
"#;

        let config = SnippetConfig::default()
            .overlay_toml(raw, Path::new("/repo"))
            .unwrap();

        assert_eq!(config.docs_root, PathBuf::from("/repo/site"));
        assert_eq!(config.output_dir, PathBuf::from("/repo/site/tests/generated"));
        assert_eq!(config.language, "py");
        assert_eq!(config.profile.sandbox_token_var, "SANDBOX_TOKEN");
        assert_eq!(
            config.profile.production_token_var,
            "EDEN_AI_PRODUCTION_API_TOKEN"
        );
        assert_eq!(
            config.profile.secret_class_for("billing.mdx"),
            SecretClass::Production
        );
        assert_eq!(
            config
                .profile
                .secret_class_for("v3/tutorials/track-optimize-spending.mdx"),
            SecretClass::Sandbox
        );
    }

    #[test]
    fn test_overlay_rejects_unknown_keys() {
        let result = SnippetConfig::new(PathBuf::from(".")).overlay_toml("colour = \"blue\"", Path::new("."));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let result = SnippetConfig::from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_configuration_validation_invalid_log_level() {
        let mut config = SnippetConfig::new(PathBuf::from("."));
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_skip_marker() {
        let mut config = SnippetConfig::new(PathBuf::from("."));
        config.skip_marker = "(unclosed".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSkipMarker(_))
        ));
    }

    #[test]
    fn test_configuration_validation_same_token_vars() {
        let mut config = SnippetConfig::new(PathBuf::from("."));
        config.profile.production_token_var = config.profile.sandbox_token_var.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_language() {
        let mut config = SnippetConfig::new(PathBuf::from("."));
        config.language = "python label".to_string();
        assert!(config.validate().is_err());

        config.language = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_display() {
        let config = SnippetConfig::new(PathBuf::from("."));
        let display = format!("{}", config);
        assert!(display.contains("Docsnip Configuration:"));
        assert!(display.contains("Sandbox Token: EDEN_AI_SANDBOX_API_TOKEN"));
    }

    #[test]
    fn test_display_map_lists_production_documents() {
        let map = SnippetConfig::new(PathBuf::from("/docs")).to_display_map();
        assert!(map["production_documents"].contains("manage-tokens.mdx"));
        assert_eq!(map["language"], "python");
        assert_eq!(map["output_dir"], "/docs/tests/generated");
    }
}
