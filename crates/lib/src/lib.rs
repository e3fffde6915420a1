//! # newsqa
//!
//! Core library for the news question/answer pipeline: AI providers, prompt
//! templates, the shared dataset types, and the question generator that turns
//! consolidated article tables into tiered question/answer pairs.

pub mod constants;
pub mod errors;
pub mod generator;
pub mod prompts;
pub mod providers;
pub mod qa;
pub mod types;

pub use errors::PromptError;
pub use generator::{GenerationOptions, QuestionGenerator};
pub use qa::{
    empty_envelope, extract_json_from_text, flatten_qa_pairs, save_qa_csv, validate_envelope,
    QaEnvelope,
};
pub use types::{ArticleRecord, DataTable, QaLevel, QaRecord};
