//! Export configuration.
//!
//! Settings come from the environment (`READECK_URL`, `READECK_AUTH_TOKEN`,
//! `READECK_ANNOTATION_SOURCE`) and can be overridden through the builder,
//! which is what the CLI does with its flags.
//!
//! # Example
//!
//! ```rust
//! use readeck_export_core::{AnnotationSource, ExportConfig};
//!
//! let config = ExportConfig::builder()
//!     .base_url("https://readeck.example.com/")
//!     .token("secret")
//!     .source(AnnotationSource::Api)
//!     .build();
//! assert_eq!(config.bookmark_url("abc"), "https://readeck.example.com/bookmarks/abc");
//! ```

use std::str::FromStr;

use crate::extract::ExtractorConfig;
use crate::fetch::FetchConfig;
use crate::formatters::MarkdownConfig;
use crate::{ExportError, Result};

/// Readeck instance used when `READECK_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const URL_ENV: &str = "READECK_URL";
pub const TOKEN_ENV: &str = "READECK_AUTH_TOKEN";
pub const SOURCE_ENV: &str = "READECK_ANNOTATION_SOURCE";

/// Where annotation text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationSource {
    /// Extract highlights from the rendered article HTML (keeps formatting).
    #[default]
    Article,
    /// Use the plain text stored by the annotations endpoint.
    Api,
}

impl FromStr for AnnotationSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" | "html" => Ok(Self::Article),
            "api" => Ok(Self::Api),
            _ => Err(format!("Invalid annotation source: {}. Valid options: article, api", s)),
        }
    }
}

/// Everything needed to export bookmarks.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Base URL of the Readeck instance
    pub base_url: String,
    /// API token sent as a Bearer credential
    pub token: Option<String>,
    pub source: AnnotationSource,
    pub fetch: FetchConfig,
    pub extractor: ExtractorConfig,
    pub markdown: MarkdownConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            source: AnnotationSource::default(),
            fetch: FetchConfig::default(),
            extractor: ExtractorConfig::default(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::new()
    }

    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = get(URL_ENV) {
            config.base_url = url;
        }
        config.token = get(TOKEN_ENV);
        if let Some(source) = get(SOURCE_ENV) {
            config.source = source.parse().map_err(ExportError::ConfigError)?;
        }
        Ok(config)
    }

    /// Web UI link for a bookmark.
    pub fn bookmark_url(&self, id: &str) -> String {
        readeck_url(&self.base_url, &["bookmarks", id])
    }
}

/// Builder for [`ExportConfig`], starting from defaults.
#[derive(Debug, Clone, Default)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn new() -> Self {
        Self { config: ExportConfig::default() }
    }

    /// Starts from an existing configuration, e.g. one read from the environment.
    pub fn from_config(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.config.base_url = value.into();
        self
    }

    pub fn token(mut self, value: impl Into<String>) -> Self {
        self.config.token = Some(value.into());
        self
    }

    pub fn source(mut self, value: AnnotationSource) -> Self {
        self.config.source = value;
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn extractor(mut self, value: ExtractorConfig) -> Self {
        self.config.extractor = value;
        self
    }

    pub fn markdown(mut self, value: MarkdownConfig) -> Self {
        self.config.markdown = value;
        self
    }

    pub fn build(self) -> ExportConfig {
        self.config
    }
}

/// Joins two URL parts with exactly one slash between them.
pub fn slash_join(left: &str, right: &str) -> String {
    format!("{}/{}", left.trim_end_matches('/'), right.trim_start_matches('/'))
}

/// Joins `parts` onto `base` with [`slash_join`].
pub fn readeck_url(base: &str, parts: &[&str]) -> String {
    parts.iter().fold(base.to_string(), |url, part| slash_join(&url, part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_export_config_default() {
        let config = ExportConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token, None);
        assert_eq!(config.source, AnnotationSource::Article);
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = ExportConfig::from_lookup(lookup(&[
            (URL_ENV, "https://read.example.org"),
            (TOKEN_ENV, "tok"),
            (SOURCE_ENV, "api"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://read.example.org");
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.source, AnnotationSource::Api);
    }

    #[test]
    fn test_from_lookup_empty_values_fall_back() {
        let config = ExportConfig::from_lookup(lookup(&[(URL_ENV, ""), (TOKEN_ENV, "  ")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_from_lookup_invalid_source() {
        let result = ExportConfig::from_lookup(lookup(&[(SOURCE_ENV, "carrier-pigeon")]));
        assert!(matches!(result, Err(ExportError::ConfigError(_))));
    }

    #[test]
    fn test_builder_overrides() {
        let base = ExportConfig::from_lookup(lookup(&[(TOKEN_ENV, "env-token")])).unwrap();
        let config = ExportConfigBuilder::from_config(base)
            .base_url("http://host:9000")
            .timeout(5)
            .user_agent("custom")
            .build();
        assert_eq!(config.token.as_deref(), Some("env-token"));
        assert_eq!(config.base_url, "http://host:9000");
        assert_eq!(config.fetch.timeout, 5);
        assert_eq!(config.fetch.user_agent, "custom");
    }

    #[test]
    fn test_annotation_source_from_str() {
        assert_eq!("article".parse::<AnnotationSource>(), Ok(AnnotationSource::Article));
        assert_eq!("HTML".parse::<AnnotationSource>(), Ok(AnnotationSource::Article));
        assert_eq!("Api".parse::<AnnotationSource>(), Ok(AnnotationSource::Api));
        assert!("other".parse::<AnnotationSource>().is_err());
    }

    #[test]
    fn test_slash_join() {
        assert_eq!(slash_join("http://a/", "/b"), "http://a/b");
        assert_eq!(slash_join("http://a", "b"), "http://a/b");
        assert_eq!(slash_join("http://a//", "b/"), "http://a/b/");
    }

    #[test]
    fn test_readeck_url_and_bookmark_url() {
        assert_eq!(readeck_url("http://a/", &["api", "/bookmarks/", "x"]), "http://a/api/bookmarks/x");
        let config = ExportConfig::builder().base_url("http://localhost:8000/").build();
        assert_eq!(config.bookmark_url("Xb7"), "http://localhost:8000/bookmarks/Xb7");
    }
}
