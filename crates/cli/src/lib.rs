//! # `newsqa` Library Crate
//!
//! Command handling for the `newsqa` binary. Each subcommand runs one stage of
//! the pipeline on its own; stages hand over data through files only.

pub mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crate::config::{get_config, AppConfig};
use newsqa::{
    providers::factory::{create_provider, ProviderSettings},
    save_qa_csv, GenerationOptions, QaLevel, QaRecord, QuestionGenerator,
};
use newsqa_sheets::{consolidate_directory, read_csv_files};
use newsqa_web::{build_http_client, crawl_category, HttpListingBrowser};
use std::path::PathBuf;
use tracing::info;

// --- CLI Argument Structs ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML configuration file. Defaults to `newsqa.yml` if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a news category and save each article's text
    Crawl(CrawlArgs),
    /// Merge crawled article files into processed_data.csv
    Consolidate(ConsolidateArgs),
    /// Generate tiered question/answer pairs from CSV tables
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
pub struct CrawlArgs {
    /// The category listing URL. Overrides `crawler.category_url`.
    #[arg(long)]
    pub url: Option<String>,
    /// Maximum number of listing pages to visit.
    #[arg(long)]
    pub max_pages: Option<usize>,
    /// Directory in which the timestamped results directory is created.
    #[arg(long)]
    pub output_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConsolidateArgs {
    /// A crawl results directory holding content_<N>.txt files.
    pub dir: PathBuf,
    /// Category label written on every row.
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// CSV files, or directories whose *.csv files are all read.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Directory for the generated qa_pairs_<timestamp>.csv.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Model identifier. Overrides `AI_MODEL`.
    #[arg(long)]
    pub model: Option<String>,
    /// Question/answer pairs requested per level.
    #[arg(long)]
    pub questions: Option<usize>,
    /// Language of the generated questions and answers.
    #[arg(long)]
    pub language: Option<String>,
}

// --- Main Logic ---

/// Runs one subcommand.
pub async fn run(cli: Cli) -> Result<()> {
    let config = get_config(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Crawl(args) => handle_crawl(args, &config).await,
        Commands::Consolidate(args) => handle_consolidate(args, &config),
        Commands::Generate(args) => handle_generate(args, &config).await,
    }
}

async fn handle_crawl(args: CrawlArgs, config: &AppConfig) -> Result<()> {
    let mut settings = config.crawler.clone();
    if let Some(url) = args.url {
        settings.category_url = url;
    }
    if let Some(max_pages) = args.max_pages {
        settings.max_pages = max_pages;
    }
    if let Some(output_root) = args.output_root {
        settings.output_root = output_root;
    }
    let crawler_config = settings.to_crawler_config();

    let mut browser = HttpListingBrowser::new(crawler_config.render_timeout)
        .context("Failed to start the listing browser")?;
    let client = build_http_client(Some(crawler_config.request_timeout))
        .context("Failed to build the HTTP client")?;

    println!(
        "Getting article links from category: {}",
        settings.category_url
    );
    let report = crawl_category(
        &mut browser,
        &client,
        &settings.category_url,
        &crawler_config,
    )
    .await?;

    match report {
        Some(report) => {
            println!(
                "\nCrawling completed. Results saved in directory: {}",
                report.output_dir.display()
            );
            println!("Summary file: {}", report.summary_path.display());
            println!(
                "Articles saved: {}, failed: {}",
                report.succeeded, report.failed
            );
        }
        None => println!("No articles found in the category"),
    }
    Ok(())
}

fn handle_consolidate(args: ConsolidateArgs, config: &AppConfig) -> Result<()> {
    let category = args
        .category
        .unwrap_or_else(|| config.consolidator.category_label.clone());

    let report = consolidate_directory(&args.dir, &category)
        .with_context(|| format!("Failed to consolidate {}", args.dir.display()))?;

    println!(
        "Processed {} files. Output saved to: {}",
        report.records_written,
        report.output_path.display()
    );
    if report.files_skipped > 0 {
        println!("Skipped {} files.", report.files_skipped);
    }
    Ok(())
}

async fn handle_generate(args: GenerateArgs, config: &AppConfig) -> Result<()> {
    let tables = read_csv_files(&args.inputs);
    if tables.is_empty() {
        println!("No CSV files found in the specified paths.");
        return Ok(());
    }

    let settings = &config.generator;
    let provider = create_provider(&ProviderSettings {
        model: args.model.unwrap_or_else(|| settings.model.clone()),
        api_key: settings.api_key.clone(),
        api_url: settings.api_url.clone(),
        local_api_url: settings.local_api_url.clone(),
    })
    .context("Failed to create the AI provider")?;

    let options = GenerationOptions {
        sample_rows: settings.sample_rows,
        questions_per_level: args.questions.unwrap_or(settings.questions_per_level),
        language: args.language.unwrap_or_else(|| settings.language.clone()),
        system_prompt_template: settings.system_prompt.clone(),
        user_prompt_template: settings.user_prompt.clone(),
    };
    let generator = QuestionGenerator::new(provider, options);

    info!("Generating questions from {} tables", tables.len());
    let records = generator
        .generate_records(&tables)
        .await
        .context("Question generation failed")?;

    print!("{}", format_qa_pairs(&records));

    let output_dir = args.output_dir.unwrap_or_else(|| settings.output_dir.clone());
    match save_qa_csv(&records, &output_dir)? {
        Some(path) => println!("\nSaved question/answer pairs to: {}", path.display()),
        None => println!("\nNo question/answer pairs were generated; nothing was saved."),
    }
    Ok(())
}

/// Renders the generated pairs grouped by level, in level order.
pub fn format_qa_pairs(records: &[QaRecord]) -> String {
    let mut out = String::from("\nGenerated questions and answers:\n");
    for level in QaLevel::ALL {
        out.push_str(&format!("\n{}:\n", level.label()));
        for record in records.iter().filter(|r| r.level == level.label()) {
            out.push_str(&format!("\nQuestion: {}\n", record.question));
            out.push_str(&format!("Answer: {}\n", record.answer));
        }
    }
    out
}
