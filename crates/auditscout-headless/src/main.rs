//! AuditScout headless scan.
//!
//! Runs the five-timeframe scan with the `headless` profile and writes
//! `risk-register-YYYY-MM-DD.md` into the configured reports directory. Meant for
//! cron or CI schedules; per-timeframe failures are written inline and do not change
//! the exit code.

use auditscout_core::headless::{central_date, write_daily_register, MISSING_API_KEY};
use auditscout_core::{
    gemini_api_key, GeminiClient, ReportGenerator, ScanProfile, ScoutConfig, ScoutError,
};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[auditscout-headless] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(api_key) = gemini_api_key() else {
        eprintln!("{}", MISSING_API_KEY);
        std::process::exit(1);
    };

    if let Err(e) = run(api_key).await {
        tracing::error!(error = %e, "headless scan failed");
        std::process::exit(1);
    }
}

async fn run(api_key: String) -> Result<(), ScoutError> {
    let config = ScoutConfig::load()?;
    let client = GeminiClient::new(api_key)?.with_base_url(&config.gemini_api_base);
    let generator = ReportGenerator::new(client, ScanProfile::headless());

    let date = central_date(chrono::Utc::now());
    write_daily_register(&generator, Path::new(&config.reports_dir), date).await?;
    Ok(())
}
