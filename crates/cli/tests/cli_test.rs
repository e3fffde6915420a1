//! # CLI Pipeline Tests
//!
//! Runs the `consolidate` and `generate` commands through `run`, the same entry
//! the binary uses, with the model endpoint served by a mock server.

use clap::Parser;
use newsqa_cli::{run, Cli};
use serde_json::json;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env_vars() {
    env::remove_var("AI_API_KEY");
    env::remove_var("AI_MODEL");
}

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("newsqa").chain(args.iter().copied()))
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[tokio::test]
async fn test_consolidate_then_generate() {
    // --- 1. Arrange ---
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();

    let workspace = tempfile::tempdir().unwrap();
    let crawl_dir = workspace.path().join("crawl_results_20250101_000000");
    fs::create_dir(&crawl_dir).unwrap();
    fs::write(crawl_dir.join("content_2.txt"), "The lab opened in May.\n").unwrap();
    fs::write(crawl_dir.join("content_1.txt"), "Admissions start in June.\n").unwrap();

    let server = MockServer::start().await;
    let envelope = json!({
        "level1_qa": [{"question": "When do admissions start?", "answer": "June"}],
        "level2_qa": [],
        "level3_qa": [{"question": "What opened first?", "answer": "Nothing, admissions come later."}],
        "level4_qa": [{"question": "Incomplete entry"}]
    });
    Mock::given(method("POST"))
        .and(path("/gemini"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": format!("Sure!\n{envelope}\n")}]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output_dir = workspace.path().join("qa");
    let config_path = workspace.path().join("newsqa.yml");
    fs::write(
        &config_path,
        format!(
            "consolidator:\n  category_label: \"test category\"\ngenerator:\n  model: \"gemini-test\"\n  api_key: \"test-key\"\n  api_url: \"{}/gemini\"\n  output_dir: \"{}\"\n",
            server.uri(),
            path_arg(&output_dir)
        ),
    )
    .unwrap();

    // --- 2. Act ---
    run(cli(&[
        "--config",
        path_arg(&config_path),
        "consolidate",
        path_arg(&crawl_dir),
    ]))
    .await
    .unwrap();

    let processed = crawl_dir.join("processed_data.csv");
    run(cli(&[
        "--config",
        path_arg(&config_path),
        "generate",
        path_arg(&processed),
    ]))
    .await
    .unwrap();

    // --- 3. Assert ---
    let consolidated = fs::read_to_string(&processed).unwrap();
    assert_eq!(
        consolidated,
        "id,category,content\n1,test category,Admissions start in June.\n2,test category,The lab opened in May.\n"
    );

    let outputs: Vec<_> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(outputs.len(), 1);
    let file_name = outputs[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("qa_pairs_") && file_name.ends_with(".csv"));

    let bytes = fs::read(&outputs[0]).unwrap();
    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec![
                "When do admissions start?".to_string(),
                "June".to_string(),
                "Cấp độ 1 - Câu hỏi cơ bản".to_string()
            ],
            vec![
                "What opened first?".to_string(),
                "Nothing, admissions come later.".to_string(),
                "Cấp độ 3 - Câu hỏi cần phân tích phức tạp".to_string()
            ],
        ]
    );
}

#[tokio::test]
async fn test_generate_without_readable_inputs_succeeds_quietly() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let workspace = tempfile::tempdir().unwrap();
    let config_path = workspace.path().join("newsqa.yml");
    fs::write(&config_path, "").unwrap();
    let missing = workspace.path().join("missing.csv");

    let result = run(cli(&[
        "--config",
        path_arg(&config_path),
        "generate",
        path_arg(&missing),
    ]))
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_generate_without_api_key_fails() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let workspace = tempfile::tempdir().unwrap();
    let config_path = workspace.path().join("newsqa.yml");
    fs::write(&config_path, "generator:\n  model: \"gemini-test\"\n").unwrap();
    let table = workspace.path().join("table.csv");
    fs::write(&table, "id,content\n1,hello\n").unwrap();

    let result = run(cli(&[
        "--config",
        path_arg(&config_path),
        "generate",
        path_arg(&table),
    ]))
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_consolidate_missing_directory_fails() {
    let _lock = ENV_LOCK.lock().unwrap();
    clear_env_vars();
    let workspace = tempfile::tempdir().unwrap();
    let config_path = workspace.path().join("newsqa.yml");
    fs::write(&config_path, "").unwrap();

    let result = run(cli(&[
        "--config",
        path_arg(&config_path),
        "consolidate",
        path_arg(&workspace.path().join("nope")),
    ]))
    .await;

    assert!(result.is_err());
}
