//! # Shared Constants
//!
//! Constants shared by the crawler, the consolidator and the question generator.
//! The file names here form the hand-off contract between the three stages.

/// Prefix of the per-article text files written by the crawler.
pub const CONTENT_FILE_PREFIX: &str = "content_";

/// Extension of the per-article text files written by the crawler.
pub const CONTENT_FILE_EXTENSION: &str = ".txt";

/// Per-run crawl summary log.
pub const SUMMARY_FILE: &str = "summary.txt";

/// Prefix of the timestamped crawl output directory.
pub const CRAWL_DIR_PREFIX: &str = "crawl_results_";

/// Consolidated dataset written next to the crawled files.
pub const PROCESSED_DATA_FILE: &str = "processed_data.csv";

/// Default directory for generated question/answer CSV files.
pub const DEFAULT_QA_OUTPUT_DIR: &str = "generated_questions";

/// Prefix of generated question/answer CSV files.
pub const QA_FILE_PREFIX: &str = "qa_pairs_";

/// `strftime` format shared by every timestamped output name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Category label assigned by the consolidator when none is configured.
pub const DEFAULT_CATEGORY_LABEL: &str = "uet, chương trình đào tạo trí tuệ nhân tạo";

/// Default model identifier for the generative language endpoint.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro-exp-03-25";

/// Builds the content file name for a 1-based article index.
pub fn content_file_name(index: usize) -> String {
    format!("{CONTENT_FILE_PREFIX}{index}{CONTENT_FILE_EXTENSION}")
}

/// Current local time rendered with [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
