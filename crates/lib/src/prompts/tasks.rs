//! # Default Task Prompts
//!
//! Hardcoded prompt templates for question/answer generation. Both templates
//! can be overridden through configuration; placeholders are substituted by
//! `generator::build_user_prompt` and `generator::build_system_prompt`.

// --- QA Generation ---
pub const QA_GENERATION_SYSTEM_PROMPT: &str = r#"You are a data analysis expert. Create suitable questions and answers based on the provided CSV data. All questions and answers must be written in {language}. You MUST return valid JSON in exactly the given format."#;

pub const QA_GENERATION_USER_PROMPT: &str = r#"Based on the following CSV data:
{context}

Create {count} questions and answers for each of the following types (all in {language}):

{levels}

You must return exactly the following JSON format:
{json_format}

Note: Return only the JSON, do not add any other text."#;
