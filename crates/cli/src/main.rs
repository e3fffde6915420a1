//! # newsqa: News Question/Answer Pipeline
//!
//! Thin entrypoint for the `newsqa` binary. All logic lives in the
//! `newsqa_cli` library crate.

use anyhow::Result;
use clap::Parser;
use newsqa_cli::{run, Cli};
use tracing_subscriber::{fmt, EnvFilter};

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load `.env` before anything reads the environment
    dotenvy::dotenv().ok();

    // 2. Setup logging
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive("newsqa=info".parse()?))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 3. Parse CLI arguments
    let cli = Cli::parse();

    // 4. Run the command and turn failures into exit code 1
    if let Err(e) = run(cli).await {
        eprintln!("[newsqa error] {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
