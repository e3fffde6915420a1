//! # Question Generator Tests
//!
//! Drives `QuestionGenerator` end to end against `MockAiProvider`, from tables
//! to the CSV written on disk.

use newsqa::{
    save_qa_csv, DataTable, GenerationOptions, PromptError, QaLevel, QuestionGenerator,
};
use newsqa_test_utils::MockAiProvider;

fn sample_tables() -> Vec<DataTable> {
    vec![DataTable::new(
        "processed_data.csv",
        vec!["id".to_string(), "category".to_string(), "content".to_string()],
        vec![vec![
            "1".to_string(),
            "news".to_string(),
            "The faculty opened a new AI lab.".to_string(),
        ]],
    )]
}

fn generator(mock: &MockAiProvider) -> QuestionGenerator {
    QuestionGenerator::new(Box::new(mock.clone()), GenerationOptions::default())
}

#[tokio::test]
async fn test_generate_from_noisy_response_writes_single_row() {
    // --- 1. Arrange ---
    let mock = MockAiProvider::new();
    mock.add_response(
        "Here is the result:\n{\"level1_qa\": [{\"question\":\"Q1?\",\"answer\":\"A1\"}], \"level2_qa\": [], \"level3_qa\": [], \"level4_qa\": []}\nThanks.",
    );
    let dir = tempfile::tempdir().unwrap();

    // --- 2. Act ---
    let records = generator(&mock)
        .generate_records(&sample_tables())
        .await
        .unwrap();
    let path = save_qa_csv(&records, dir.path().join("generated_questions"))
        .unwrap()
        .expect("a CSV file should be written");

    // --- 3. Assert ---
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "CSV should start with a BOM");
    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["question", "answer", "level"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "Q1?");
    assert_eq!(&rows[0][1], "A1");
    assert_eq!(&rows[0][2], QaLevel::BasicFact.label());
}

#[tokio::test]
async fn test_generate_sends_single_call_with_context() {
    let mock = MockAiProvider::new();
    mock.add_response("{}");

    generator(&mock).generate(&sample_tables()).await.unwrap();

    let calls = mock.get_calls();
    assert_eq!(calls.len(), 1);
    let (system_prompt, user_prompt) = &calls[0];
    assert!(system_prompt.contains("valid JSON"));
    assert!(user_prompt.contains("Columns: id, category, content"));
    assert!(user_prompt.contains("The faculty opened a new AI lab."));
}

#[tokio::test]
async fn test_generate_repairs_wrong_shaped_envelope() {
    let mock = MockAiProvider::new();
    mock.add_response(
        r#"{"level1_qa": "oops", "level3_qa": [{"question": "Why?", "answer": "Because."}]}"#,
    );

    let envelope = generator(&mock).generate(&sample_tables()).await.unwrap();

    for level in QaLevel::ALL {
        assert!(envelope[level.key()].is_array(), "{} should be a list", level.key());
    }
    assert_eq!(envelope["level1_qa"].as_array().unwrap().len(), 0);
    assert_eq!(envelope["level3_qa"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_generate_with_unparseable_response_yields_no_rows() {
    let mock = MockAiProvider::new();
    mock.add_response("I am unable to produce JSON today.");
    let dir = tempfile::tempdir().unwrap();

    let records = generator(&mock)
        .generate_records(&sample_tables())
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(save_qa_csv(&records, dir.path()).unwrap().is_none());
}

#[tokio::test]
async fn test_generate_propagates_provider_errors() {
    let mock = MockAiProvider::new();
    mock.add_error("quota exceeded");

    let result = generator(&mock).generate(&sample_tables()).await;

    match result {
        Err(PromptError::AiApi(message)) => assert!(message.contains("quota exceeded")),
        other => panic!("Expected AiApi error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_generate_without_tables_is_rejected() {
    let mock = MockAiProvider::new();

    let result = generator(&mock).generate(&[]).await;

    assert!(matches!(result, Err(PromptError::NoInputTables)));
    assert!(mock.get_calls().is_empty());
}
