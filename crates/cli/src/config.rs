//! # Application Configuration
//!
//! Loads the settings of the three pipeline stages in layers:
//!
//! 1. Defaults compiled into this module.
//! 2. An optional YAML file (`--config <path>`, or `newsqa.yml` in the working
//!    directory). `${VAR}` placeholders are replaced with environment values.
//! 3. `NEWSQA_`-prefixed environment variables, with `__` between nested keys
//!    (e.g. `NEWSQA_CRAWLER__MAX_PAGES=3`).
//!
//! The model credential and identifier are finally taken from `AI_API_KEY` and
//! `AI_MODEL` when those are set.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use newsqa::constants::{DEFAULT_CATEGORY_LABEL, DEFAULT_MODEL, DEFAULT_QA_OUTPUT_DIR};
use newsqa_html::ArticleSelectors;
use newsqa_web::{CrawlerConfig, ListingSelectors};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Configuration file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "newsqa.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    General(String),
    #[error("Configuration file not found at '{0}'")]
    NotFound(PathBuf),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `newsqa.yml`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub crawler: CrawlerSettings,
    pub consolidator: ConsolidatorSettings,
    pub generator: GeneratorSettings,
}

/// Settings of the `crawl` command.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CrawlerSettings {
    pub category_url: String,
    pub max_pages: usize,
    pub page_delay_ms: u64,
    pub render_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub output_root: PathBuf,
    pub listing_item_selector: String,
    pub detail_link_selector: String,
    /// `{page}` is replaced with the number of the page being moved to.
    pub next_page_selector: String,
    pub content_selectors: Vec<String>,
    pub metadata_selector: Option<String>,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        let crawler = CrawlerConfig::default();
        Self {
            category_url: "https://uet.vnu.edu.vn/category/tin-tuc/tin-sinh-vien/".to_string(),
            max_pages: crawler.max_pages,
            page_delay_ms: crawler.page_delay.as_millis() as u64,
            render_timeout_secs: crawler.render_timeout.as_secs(),
            request_timeout_secs: crawler.request_timeout.as_secs(),
            output_root: crawler.output_root,
            listing_item_selector: crawler.listing.item,
            detail_link_selector: crawler.listing.detail_link,
            next_page_selector: crawler.listing.next_page,
            content_selectors: crawler.article.containers,
            metadata_selector: crawler.article.metadata,
        }
    }
}

impl CrawlerSettings {
    pub fn to_crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig {
            max_pages: self.max_pages,
            page_delay: Duration::from_millis(self.page_delay_ms),
            render_timeout: Duration::from_secs(self.render_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            output_root: self.output_root.clone(),
            listing: ListingSelectors {
                item: self.listing_item_selector.clone(),
                detail_link: self.detail_link_selector.clone(),
                next_page: self.next_page_selector.clone(),
            },
            article: ArticleSelectors {
                containers: self.content_selectors.clone(),
                metadata: self.metadata_selector.clone(),
            },
        }
    }
}

/// Settings of the `consolidate` command.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ConsolidatorSettings {
    pub category_label: String,
}

impl Default for ConsolidatorSettings {
    fn default() -> Self {
        Self {
            category_label: DEFAULT_CATEGORY_LABEL.to_string(),
        }
    }
}

/// Settings of the `generate` command.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneratorSettings {
    pub model: String,
    pub api_key: Option<String>,
    /// Overrides the derived Gemini endpoint.
    pub api_url: Option<String>,
    /// Chat-completions endpoint for non-Gemini models.
    pub local_api_url: Option<String>,
    pub output_dir: PathBuf,
    pub sample_rows: usize,
    pub questions_per_level: usize,
    pub language: String,
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_url: None,
            local_api_url: None,
            output_dir: PathBuf::from(DEFAULT_QA_OUTPUT_DIR),
            sample_rows: 5,
            questions_per_level: 5,
            language: "Vietnamese".to_string(),
            system_prompt: None,
            user_prompt: None,
        }
    }
}

// Reads a file and replaces `${VAR}` placeholders with environment values.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded.into_owned()))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Loads the application configuration.
///
/// An explicitly given file must exist; the default `newsqa.yml` is optional.
pub fn get_config(config_path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let file_content = match config_path_override {
        Some(path) => Some(
            read_and_substitute(path)?.ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))?,
        ),
        None => read_and_substitute(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    if let Some(content) = file_content {
        info!("Loaded configuration file.");
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("NEWSQA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if let Some(api_key) = non_empty_env("AI_API_KEY") {
        config.generator.api_key = Some(api_key);
    }
    if let Some(model) = non_empty_env("AI_MODEL") {
        config.generator.model = model;
    }

    Ok(config)
}
