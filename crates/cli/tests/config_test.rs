//! # Configuration Tests
//!
//! This file contains tests for the layered configuration loading: defaults,
//! YAML file with `${VAR}` substitution, and environment overrides.

use newsqa_cli::config::{get_config, ConfigError};
use std::env;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;

// Environment variables are process-global; tests touching them run one at a time.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Clears every environment variable `get_config` reads.
fn clear_env_vars() {
    for (key, _) in env::vars() {
        if key.starts_with("NEWSQA_") {
            env::remove_var(key);
        }
    }
    env::remove_var("AI_API_KEY");
    env::remove_var("AI_MODEL");
    env::remove_var("TEST_NEWSQA_KEY");
}

fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_defaults_without_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.yml");
    fs::write(&path, "").unwrap();

    let config = get_config(Some(&path)).expect("Configuration should load");

    assert_eq!(config.crawler.max_pages, 5);
    assert_eq!(
        config.crawler.category_url,
        "https://uet.vnu.edu.vn/category/tin-tuc/tin-sinh-vien/"
    );
    let crawler = config.crawler.to_crawler_config();
    assert_eq!(crawler.page_delay, Duration::from_secs(2));
    assert_eq!(crawler.render_timeout, Duration::from_secs(10));
    assert_eq!(crawler.listing.item, ".post-item");
    assert_eq!(crawler.article.containers.len(), 2);
    assert_eq!(
        config.consolidator.category_label,
        "uet, chương trình đào tạo trí tuệ nhân tạo"
    );
    assert_eq!(config.generator.model, "gemini-2.5-pro-exp-03-25");
    assert_eq!(config.generator.api_key, None);
    assert_eq!(config.generator.questions_per_level, 5);
    assert_eq!(config.generator.language, "Vietnamese");
    assert_eq!(
        config.generator.output_dir,
        std::path::PathBuf::from("generated_questions")
    );
}

#[test]
fn test_yaml_file_with_substitution() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var("TEST_NEWSQA_KEY", "secret-from-env");

    let (_dir, path) = write_config(
        r#"
crawler:
  max_pages: 2
  page_delay_ms: 0
consolidator:
  category_label: "science news"
generator:
  model: "local-model"
  api_key: "${TEST_NEWSQA_KEY}"
  local_api_url: "http://localhost:9999/v1/chat/completions"
  language: "English"
"#,
    );

    let config = get_config(Some(&path)).unwrap();

    assert_eq!(config.crawler.max_pages, 2);
    assert_eq!(config.crawler.to_crawler_config().page_delay, Duration::ZERO);
    assert_eq!(config.crawler.listing_item_selector, ".post-item");
    assert_eq!(config.consolidator.category_label, "science news");
    assert_eq!(config.generator.model, "local-model");
    assert_eq!(config.generator.api_key.as_deref(), Some("secret-from-env"));
    assert_eq!(
        config.generator.local_api_url.as_deref(),
        Some("http://localhost:9999/v1/chat/completions")
    );
    assert_eq!(config.generator.language, "English");

    clear_env_vars();
}

#[test]
fn test_environment_overrides_file() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    env::set_var("NEWSQA_CRAWLER__MAX_PAGES", "3");
    env::set_var("NEWSQA_GENERATOR__LANGUAGE", "French");
    env::set_var("AI_API_KEY", "env-key");
    env::set_var("AI_MODEL", "gemini-test");

    let (_dir, path) = write_config(
        r#"
crawler:
  max_pages: 1
generator:
  model: "from-file"
  api_key: "file-key"
"#,
    );

    let config = get_config(Some(&path)).unwrap();

    assert_eq!(config.crawler.max_pages, 3);
    assert_eq!(config.generator.language, "French");
    assert_eq!(config.generator.api_key.as_deref(), Some("env-key"));
    assert_eq!(config.generator.model, "gemini-test");

    clear_env_vars();
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yml");

    let result = get_config(Some(&missing));

    assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == missing));
}
