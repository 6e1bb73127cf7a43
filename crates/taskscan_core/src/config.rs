//! Extraction run configuration.
//!
//! # Responsibility
//! - Select the output layout and context window size of a run.
//! - Extend the layout's curated seed lists.
//!
//! # Invariants
//! - A validated config always has `window_size >= 1`.

use crate::extract::window::DEFAULT_WINDOW_SIZE;
use crate::model::layout::Layout;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Settings for one extraction run, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default = "ExtractorConfig::default_window_size")]
    pub window_size: usize,
    /// Appended to the layout's part-number seeds.
    #[serde(default)]
    pub extra_part_numbers: Vec<String>,
    /// Appended to the layout's documentation seeds.
    #[serde(default)]
    pub extra_documentation: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            window_size: Self::default_window_size(),
            extra_part_numbers: Vec::new(),
            extra_documentation: Vec::new(),
        }
    }
}

impl ExtractorConfig {
    fn default_window_size() -> usize {
        DEFAULT_WINDOW_SIZE
    }

    /// Default settings for `layout`.
    pub fn for_layout(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        Ok(())
    }
}

/// Config loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    InvalidWindowSize(usize),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::InvalidWindowSize(size) => {
                write!(f, "window_size must be at least 1, got {size}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidWindowSize(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ExtractorConfig};
    use crate::model::layout::Layout;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ExtractorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ExtractorConfig::default());
        assert_eq!(config.window_size, 3);
        assert_eq!(config.layout, Layout::Tdmplmd);
    }

    #[test]
    fn fields_are_read_from_json() {
        let config = ExtractorConfig::from_json_str(
            r#"{"layout":"tddm","window_size":4,"extra_documentation":["CMM 32.11.00"]}"#,
        )
        .unwrap();
        assert_eq!(config.layout, Layout::Tddm);
        assert_eq!(config.window_size, 4);
        assert_eq!(config.extra_documentation, vec!["CMM 32.11.00"]);
        assert!(config.extra_part_numbers.is_empty());
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = ExtractorConfig::from_json_str(r#"{"window_size":0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWindowSize(0)));
    }

    #[test]
    fn unknown_layout_is_a_parse_error() {
        let err = ExtractorConfig::from_json_str(r#"{"layout":"tdx"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
