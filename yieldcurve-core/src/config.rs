//! Serializable run configuration.
//!
//! Every section has defaults, so an empty or missing file is a valid
//! configuration pointing at the Bucharest Stock Exchange.

use crate::data::catalog::GOVERNMENT_BOND_CATEGORY;
use crate::data::{CorruptCachePolicy, LabelPatternExtractor, RandomPacer};
use crate::domain::CurrencyClassifier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Placeholder substituted with the instrument code in `detail_url_template`.
pub const CODE_PLACEHOLDER: &str = "{code}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub source: SourceConfig,
    pub catalog: CatalogConfig,
    pub pacing: PacingConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Downloaded bond list.
    pub catalog: PathBuf,
    /// JSON yield cache.
    pub cache: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("bonds_list.csv"),
            cache: PathBuf::from("cache.json"),
        }
    }
}

/// Upstream endpoints and request headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub detail_url_template: String,
    pub catalog_url: String,
    pub user_agent: String,
    /// Locale preference sent with the catalog download.
    pub catalog_cookie: String,
    pub timeout_secs: u64,
    pub yield_label: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            detail_url_template:
                "https://m.bvb.ro/FinancialInstruments/Details/FinancialInstrumentsDetails.aspx?s={code}"
                    .into(),
            catalog_url: "https://www.bvb.ro/FinancialInstruments/Markets/BondsListForDownload.ashx"
                .into(),
            user_agent: "Mozilla/5.0".into(),
            catalog_cookie: "BVBCulturePref=ro-RO".into(),
            timeout_secs: 30,
            yield_label: LabelPatternExtractor::DEFAULT_LABEL.into(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn detail_url(&self, code: &str) -> String {
        self.detail_url_template.replace(CODE_PLACEHOLDER, code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Value of the type column that marks a government bond.
    pub category: String,
    /// Code suffix of EUR-settled instruments.
    pub eur_suffix: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            category: GOVERNMENT_BOND_CATEGORY.into(),
            eur_suffix: CurrencyClassifier::DEFAULT_EUR_SUFFIX.into(),
        }
    }
}

impl CatalogConfig {
    pub fn classifier(&self) -> CurrencyClassifier {
        CurrencyClassifier::new(self.eur_suffix.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 300,
            max_delay_ms: 700,
        }
    }
}

impl PacingConfig {
    pub fn pacer(&self) -> RandomPacer {
        RandomPacer::from_millis(self.min_delay_ms, self.max_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub on_corrupt: CorruptCachePolicy,
}

impl AppConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.eur_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "catalog.eur_suffix must not be empty".into(),
            ));
        }
        if self.pacing.min_delay_ms > self.pacing.max_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "pacing.min_delay_ms ({}) exceeds pacing.max_delay_ms ({})",
                self.pacing.min_delay_ms, self.pacing.max_delay_ms
            )));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "source.timeout_secs must be positive".into(),
            ));
        }
        if !self.source.detail_url_template.contains(CODE_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "source.detail_url_template must contain {CODE_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.paths.catalog, PathBuf::from("bonds_list.csv"));
        assert_eq!(config.catalog.category, "Titluri de stat");
        assert_eq!(config.cache.on_corrupt, CorruptCachePolicy::Quarantine);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
[pacing]
min_delay_ms = 1000
max_delay_ms = 3000

[cache]
on_corrupt = "fail"
"#,
        )
        .unwrap();
        assert_eq!(config.pacing.min_delay_ms, 1000);
        assert_eq!(config.pacing.max_delay_ms, 3000);
        assert_eq!(config.cache.on_corrupt, CorruptCachePolicy::Fail);
        assert_eq!(config.source.timeout_secs, 30);
    }

    #[test]
    fn detail_url_substitutes_code() {
        let source = SourceConfig::default();
        assert_eq!(
            source.detail_url("R2506A"),
            "https://m.bvb.ro/FinancialInstruments/Details/FinancialInstrumentsDetails.aspx?s=R2506A"
        );
    }

    #[test]
    fn rejects_inverted_pacing() {
        let err = AppConfig::from_toml("[pacing]\nmin_delay_ms = 900\nmax_delay_ms = 100\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_empty_suffix_and_zero_timeout() {
        assert!(AppConfig::from_toml("[catalog]\neur_suffix = \"\"\n").is_err());
        assert!(AppConfig::from_toml("[source]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let err = AppConfig::from_toml("[source]\ndetail_url_template = \"https://x/\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("{code}"));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(matches!(
            AppConfig::from_toml("[cache]\non_corrupt = \"ignore\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
