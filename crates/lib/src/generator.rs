//! # Question Generator
//!
//! Summarizes one or more tables into a prompt, asks the configured model for
//! question/answer pairs at every [`QaLevel`], and returns a validated envelope.

use crate::{
    errors::PromptError,
    prompts::tasks::{QA_GENERATION_SYSTEM_PROMPT, QA_GENERATION_USER_PROMPT},
    providers::ai::AiProvider,
    qa::{extract_json_from_text, flatten_qa_pairs, validate_envelope, QaEnvelope},
    types::{DataTable, QaLevel, QaRecord},
};
use tracing::{debug, info};

/// Tunables for a generation run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Rows of each table shown to the model.
    pub sample_rows: usize,
    /// Pairs requested per level.
    pub questions_per_level: usize,
    /// Language the questions and answers must be written in.
    pub language: String,
    pub system_prompt_template: Option<String>,
    pub user_prompt_template: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            sample_rows: 5,
            questions_per_level: 5,
            language: "Vietnamese".to_string(),
            system_prompt_template: None,
            user_prompt_template: None,
        }
    }
}

/// Renders the column names and a row sample of every table.
pub fn build_context(tables: &[DataTable], sample_rows: usize) -> String {
    let mut context = String::new();
    for (i, table) in tables.iter().enumerate() {
        context.push_str(&format!("\nTable {} ({}):\n", i + 1, table.source.display()));
        context.push_str(&format!("Columns: {}\n", table.headers.join(", ")));
        context.push_str(&format!(
            "Sample data:\n{}\n",
            table.render_sample(sample_rows)
        ));
    }
    context
}

/// The JSON shape the model must reply with, filled with placeholder pairs.
fn json_format_example(count: usize) -> String {
    let levels: Vec<String> = QaLevel::ALL
        .iter()
        .map(|level| {
            let pairs: Vec<String> = (1..=count)
                .map(|n| format!(r#"        {{"question": "Question {n}?", "answer": "Answer {n}"}}"#))
                .collect();
            format!("    \"{}\": [\n{}\n    ]", level.key(), pairs.join(",\n"))
        })
        .collect();
    format!("{{\n{}\n}}", levels.join(",\n"))
}

pub fn build_system_prompt(options: &GenerationOptions) -> String {
    options
        .system_prompt_template
        .as_deref()
        .unwrap_or(QA_GENERATION_SYSTEM_PROMPT)
        .replace("{language}", &options.language)
}

pub fn build_user_prompt(context: &str, options: &GenerationOptions) -> String {
    let levels = QaLevel::ALL
        .iter()
        .enumerate()
        .map(|(i, level)| format!("{}. {}", i + 1, level.description()))
        .collect::<Vec<_>>()
        .join("\n");

    options
        .user_prompt_template
        .as_deref()
        .unwrap_or(QA_GENERATION_USER_PROMPT)
        .replace("{levels}", &levels)
        .replace("{count}", &options.questions_per_level.to_string())
        .replace("{language}", &options.language)
        .replace(
            "{json_format}",
            &json_format_example(options.questions_per_level),
        )
        .replace("{context}", context)
}

/// Generates tiered question/answer pairs from tabular data.
#[derive(Debug)]
pub struct QuestionGenerator {
    ai_provider: Box<dyn AiProvider>,
    options: GenerationOptions,
}

impl QuestionGenerator {
    pub fn new(ai_provider: Box<dyn AiProvider>, options: GenerationOptions) -> Self {
        Self {
            ai_provider,
            options,
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Sends one prompt covering every table and returns the validated envelope.
    ///
    /// Provider failures are returned as errors. A reply that holds no usable
    /// JSON is not an error: it yields the four-key empty envelope.
    pub async fn generate(&self, tables: &[DataTable]) -> Result<QaEnvelope, PromptError> {
        if tables.is_empty() {
            return Err(PromptError::NoInputTables);
        }

        let context = build_context(tables, self.options.sample_rows);
        let system_prompt = build_system_prompt(&self.options);
        let user_prompt = build_user_prompt(&context, &self.options);

        info!(
            "Requesting {} question/answer pairs per level for {} table(s).",
            self.options.questions_per_level,
            tables.len()
        );
        debug!(system_prompt = %system_prompt, user_prompt = %user_prompt, "--> Sending prompts to AI Provider");

        let raw_response = self
            .ai_provider
            .generate(&system_prompt, &user_prompt)
            .await?;

        debug!("<-- Raw response from AI: {}", raw_response);

        let mut envelope = extract_json_from_text(&raw_response);
        validate_envelope(&mut envelope);
        Ok(envelope)
    }

    /// Like [`QuestionGenerator::generate`], flattened into CSV rows.
    pub async fn generate_records(
        &self,
        tables: &[DataTable],
    ) -> Result<Vec<QaRecord>, PromptError> {
        let envelope = self.generate(tables).await?;
        Ok(flatten_qa_pairs(&envelope))
    }
}
