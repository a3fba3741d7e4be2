/// Configuration loading for the Emmet integration
use crate::classifier::TokenRules;
use crate::error::{EmmetError, EmmetResult};
use crate::expander::SnippetsMap;
use crate::noise::NoisePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Most filter suffixes the engine accepts on one abbreviation
pub const MAX_FILTERS: usize = 3;

/// When the expanded abbreviation is offered in completion lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowExpandedAbbreviation {
    #[default]
    Always,
    /// Markup and stylesheet buffers only; script buffers get nothing
    InMarkupAndStylesheetFilesOnly,
    Never,
}

/// Output-filter suffix parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    pub max_filters: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_filters: MAX_FILTERS,
        }
    }
}

/// Emmet configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmmetConfig {
    pub show_expanded_abbreviation: ShowExpandedAbbreviation,
    /// Offer snippet names that start with the typed tag
    pub show_abbreviation_suggestions: bool,
    /// Report suggestions with the snippet kind instead of property
    pub show_suggestions_as_snippets: bool,
    /// Language ids that never get a provider
    pub exclude_languages: Vec<String>,
    pub token_rules: TokenRules,
    pub noise: NoisePolicy,
    /// Custom snippets keyed by language id
    pub snippets: BTreeMap<String, SnippetsMap>,
    pub filters: FilterConfig,
}

impl Default for EmmetConfig {
    fn default() -> Self {
        Self {
            show_expanded_abbreviation: ShowExpandedAbbreviation::Always,
            show_abbreviation_suggestions: true,
            show_suggestions_as_snippets: false,
            exclude_languages: Vec::new(),
            token_rules: TokenRules::default(),
            noise: NoisePolicy::default(),
            snippets: BTreeMap::new(),
            filters: FilterConfig::default(),
        }
    }
}

impl EmmetConfig {
    pub fn is_language_excluded(&self, language: &str) -> bool {
        self.exclude_languages
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(language))
    }

    /// Filter limit in effect; 0 when suffix parsing is off
    pub fn max_filters(&self) -> usize {
        if self.filters.enabled {
            self.filters.max_filters
        } else {
            0
        }
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

/// Loads and validates [`EmmetConfig`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> EmmetResult<EmmetConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Yaml)
    }

    /// Load configuration from a JSON file
    pub fn load_from_json(path: &Path) -> EmmetResult<EmmetConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Json)
    }

    /// Load a file, picking the format from its extension
    pub fn load_from_path(path: &Path) -> EmmetResult<EmmetConfig> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::load_from_yaml(path),
            Some("json") => Self::load_from_json(path),
            _ => Err(EmmetError::config_error(format!(
                "Unrecognized configuration file: {}",
                path.display()
            ))),
        }
    }

    /// Load configuration from a string
    pub fn load_from_string(content: &str, format: ConfigFormat) -> EmmetResult<EmmetConfig> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate_config(config: &EmmetConfig) -> EmmetResult<()> {
        if config.filters.max_filters > MAX_FILTERS {
            return Err(EmmetError::config_error(format!(
                "filters.max_filters must be at most {}, got {}",
                MAX_FILTERS, config.filters.max_filters
            )));
        }

        if config.noise.long_property_threshold == 0 {
            return Err(EmmetError::config_error(
                "noise.long_property_threshold must be positive",
            ));
        }

        for (language, snippets) in &config.snippets {
            if snippets.keys().any(|name| name.trim().is_empty()) {
                return Err(EmmetError::config_error(format!(
                    "Snippet names cannot be empty (language `{}`)",
                    language
                )));
            }
        }

        Ok(())
    }
}
