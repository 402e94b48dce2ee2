// crates/engine/src/config.rs
use crate::error::{EngineError, Result};
use derive_builder::Builder;
use metric_lens_core::AnalysisConfig;
use metric_lens_core::complexity::ComplexityRules;
use serde::Deserialize;
use std::path::Path;

/// 既定で数えるコメント内キーワード
pub const DEFAULT_COMMENT_KEYWORDS: [&str; 4] = ["bug", "wtf", "todo", "hack"];

/// 既定の最大ファイルサイズ (16 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

fn default_keywords() -> Vec<String> {
    DEFAULT_COMMENT_KEYWORDS.iter().map(|k| (*k).to_string()).collect()
}

/// Settings for a multi-file run.
///
/// Built with [`EngineConfigBuilder`] or read from a JSON (or YAML) file;
/// either way call [`EngineConfig::validate`] before use. [`crate::run`]
/// does so itself.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Deserialize)]
#[builder(setter(into))]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Stop at the first file error instead of collecting errors.
    #[builder(default)]
    pub strict: bool,
    /// Worker threads of the analysis pool.
    #[builder(default = "num_cpus::get()")]
    pub threads: usize,
    #[builder(default)]
    pub rules: ComplexityRules,
    /// Extension remapping, e.g. `inc` → `php`.
    #[builder(default)]
    pub map_ext: hashbrown::HashMap<String, String>,
    /// Parse every `.h` header as C; by default headers are C++.
    #[builder(default)]
    pub parse_all_h_as_c: bool,
    /// Directory or file names (path components) whose `.h` headers are C.
    #[builder(default)]
    pub parse_some_h_as_c: Vec<String>,
    /// Words counted case-insensitively inside comments.
    #[builder(default = "default_keywords()")]
    pub comment_keywords: Vec<String>,
    /// Files larger than this many bytes are rejected.
    #[builder(default = "DEFAULT_MAX_FILE_SIZE")]
    pub max_file_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict: false,
            threads: num_cpus::get(),
            rules: ComplexityRules::default(),
            map_ext: hashbrown::HashMap::new(),
            parse_all_h_as_c: false,
            parse_some_h_as_c: Vec::new(),
            comment_keywords: default_keywords(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Json`] on malformed input or unknown fields.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a YAML document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Yaml`] on malformed input or unknown fields.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads and validates a config file; `.yaml`/`.yml` are YAML, anything else JSON.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, does not parse or is invalid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let config = if is_yaml {
            Self::parse_yaml(&text)?
        } else {
            Self::from_json_str(&text)?
        };
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "yaml")]
    fn parse_yaml(text: &str) -> Result<Self> {
        Self::from_yaml_str(text)
    }

    #[cfg(not(feature = "yaml"))]
    fn parse_yaml(_text: &str) -> Result<Self> {
        Err(EngineError::Config(
            "YAML configuration requires the `yaml` feature".to_string(),
        ))
    }

    /// Rejects settings no run can use.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] for zero threads, a zero size limit,
    /// an empty comment keyword, an empty extension mapping or an empty
    /// `parse_some_h_as_c` entry.
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(EngineError::Config("threads must be at least 1".to_string()));
        }
        if self.max_file_size == 0 {
            return Err(EngineError::Config("max_file_size must be positive".to_string()));
        }
        if self.comment_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(EngineError::Config("comment keywords must not be empty".to_string()));
        }
        if let Some((from, to)) = self
            .map_ext
            .iter()
            .find(|(from, to)| from.is_empty() || to.is_empty())
        {
            return Err(EngineError::Config(format!(
                "invalid extension mapping '{from}' -> '{to}'"
            )));
        }
        if self.parse_some_h_as_c.iter().any(|name| name.trim().is_empty()) {
            return Err(EngineError::Config(
                "parse_some_h_as_c entries must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The per-unit part of the configuration.
    #[must_use]
    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            rules: self.rules,
            map_ext: self
                .map_ext
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_lowercase()))
                .collect(),
            parse_all_h_as_c: self.parse_all_h_as_c,
            parse_some_h_as_c: self
                .parse_some_h_as_c
                .iter()
                .map(|name| name.trim().to_string())
                .collect(),
        }
    }
}
