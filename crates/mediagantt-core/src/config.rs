use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::categorizer::Categorizer;
use crate::importance::Thresholds;
use crate::timeline::parse_date_token;

pub const DEFAULT_END_DATE: &str = "2025/01";
pub const DEFAULT_CATEGORY_KEYWORDS: &str =
    "Software|Hardware|Theory|Traditional Skills|Medium|Others";
pub const DEFAULT_MILESTONE_KEYWORDS: &str = "Theory|other";

const KEYWORD_DELIMITER: char = '|';

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold '{name}' must be an integer, got '{value}'")]
    InvalidThreshold { name: &'static str, value: String },
    #[error("category keywords could not be compiled: {source}")]
    KeywordPattern {
        #[source]
        source: regex::Error,
    },
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A threshold as typed by a user: either a TOML integer or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdInput {
    Integer(i64),
    Text(String),
}

impl ThresholdInput {
    fn resolve(&self, name: &'static str) -> Result<i64, ConfigError> {
        match self {
            ThresholdInput::Integer(value) => Ok(*value),
            ThresholdInput::Text(text) => {
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::InvalidThreshold {
                        name,
                        value: text.clone(),
                    })
            }
        }
    }
}

impl From<i64> for ThresholdInput {
    fn from(value: i64) -> Self {
        ThresholdInput::Integer(value)
    }
}

impl From<&str> for ThresholdInput {
    fn from(value: &str) -> Self {
        ThresholdInput::Text(value.to_string())
    }
}

impl fmt::Display for ThresholdInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdInput::Integer(value) => write!(f, "{value}"),
            ThresholdInput::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawThresholds {
    pub crit: ThresholdInput,
    pub active: ThresholdInput,
    pub done: ThresholdInput,
}

impl Default for RawThresholds {
    fn default() -> Self {
        let defaults = Thresholds::default();
        Self {
            crit: defaults.crit.into(),
            active: defaults.active.into(),
            done: defaults.done.into(),
        }
    }
}

/// Settings exactly as a caller supplies them, before validation.
///
/// Keyword lists are pipe-delimited (`Software|Hardware`). Missing TOML keys fall back
/// to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    pub default_end_date: String,
    pub category_keywords: String,
    pub milestone_keywords: String,
    pub thresholds: RawThresholds,
    pub custom_theme: bool,
    pub append_timeline: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            default_end_date: DEFAULT_END_DATE.to_string(),
            category_keywords: DEFAULT_CATEGORY_KEYWORDS.to_string(),
            milestone_keywords: DEFAULT_MILESTONE_KEYWORDS.to_string(),
            thresholds: RawThresholds::default(),
            custom_theme: false,
            append_timeline: true,
        }
    }
}

impl RawConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Splits keyword lists and checks thresholds. Nothing is coerced: a threshold that
    /// is not an integer rejects the whole configuration.
    pub fn validate(&self) -> Result<PipelineConfig, ConfigError> {
        let thresholds = Thresholds {
            crit: self.thresholds.crit.resolve("crit")?,
            active: self.thresholds.active.resolve("active")?,
            done: self.thresholds.done.resolve("done")?,
        };

        let categorizer = Categorizer::new(split_keywords(&self.category_keywords))
            .map_err(|source| ConfigError::KeywordPattern { source })?;

        let default_end_date = self.default_end_date.trim().to_string();
        if let Err(err) = parse_date_token(&default_end_date) {
            warn!(
                default_end_date = %default_end_date,
                error = %err,
                "default end date is not a recognized date; open-ended timelines will be invalid"
            );
        }

        Ok(PipelineConfig {
            default_end_date,
            categorizer,
            milestone_keywords: split_keywords(&self.milestone_keywords),
            thresholds,
            custom_theme: self.custom_theme,
            append_timeline: self.append_timeline,
        })
    }
}

/// Validated, read-only settings passed into every pipeline and generator call.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub default_end_date: String,
    pub categorizer: Categorizer,
    pub milestone_keywords: Vec<String>,
    pub thresholds: Thresholds,
    pub custom_theme: bool,
    pub append_timeline: bool,
}

impl PipelineConfig {
    pub fn category_keywords(&self) -> impl Iterator<Item = &str> {
        self.categorizer.keywords()
    }

    pub fn is_configured_category(&self, label: &str) -> bool {
        self.categorizer.is_label(label)
    }
}

/// Splits a pipe-delimited list, trimming entries and dropping empty ones.
pub fn split_keywords(list: &str) -> Vec<String> {
    list.split(KEYWORD_DELIMITER)
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}
