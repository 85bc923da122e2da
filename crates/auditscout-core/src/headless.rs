//! Helpers for the unattended run: dating and writing the daily register.

use crate::error::ScoutResult;
use crate::generator::{GenerationService, ReportGenerator};
use crate::markdown::register_document;
use crate::orchestrator::ScanSession;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::America::Chicago;
use std::path::{Path, PathBuf};

/// Printed to stderr when no Gemini key is configured.
pub const MISSING_API_KEY: &str = "Error: API_KEY environment variable is required.";

/// Calendar date in US Central time, which names the register file.
pub fn central_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Chicago).date_naive()
}

pub fn register_file_name(date: NaiveDate) -> String {
    format!("risk-register-{}.md", date.format("%Y-%m-%d"))
}

/// Write the register into `dir` (created if absent) and return the file path.
pub fn write_register(dir: &Path, date: NaiveDate, document: &str) -> ScoutResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(register_file_name(date));
    std::fs::write(&path, document)?;
    Ok(path)
}

/// Scan every timeframe and write the register for `date` into `dir`.
///
/// Failed timeframes are noted inline in the file; only scan-claim and I/O errors
/// fail the run.
pub async fn write_daily_register<S: GenerationService>(
    generator: &ReportGenerator<S>,
    dir: &Path,
    date: NaiveDate,
) -> ScoutResult<PathBuf> {
    let profile = generator.profile();
    tracing::info!(
        date = %date,
        model = profile.model,
        template = profile.template.name,
        "starting daily risk scan"
    );

    let snapshot = ScanSession::new().run(generator, date).await?;
    let failed = snapshot
        .reports
        .items()
        .iter()
        .filter(|r| !r.is_completed())
        .count();

    let document = register_document(
        snapshot.reports.items(),
        &date.format("%Y-%m-%d").to_string(),
        profile.model,
    );
    let path = write_register(dir, date, &document)?;
    tracing::info!(path = %path.display(), failed, "risk register written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn central_date_lags_utc_late_evening() {
        // 03:30 UTC on Jan 2 is still Jan 1 in Chicago (UTC-6).
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 30, 0).unwrap();
        assert_eq!(central_date(now), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn file_name_is_dated() {
        let d = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(register_file_name(d), "risk-register-2025-07-04.md");
    }

    struct FailsOnWeek;

    #[async_trait::async_trait]
    impl GenerationService for FailsOnWeek {
        async fn generate(
            &self,
            request: crate::generator::GenerationRequest,
        ) -> ScoutResult<crate::generator::GenerationResponse> {
            if request.prompt.contains("(Past Week)") {
                return Err(crate::error::ScoutError::Generation("rate limited".into()));
            }
            Ok(crate::generator::GenerationResponse {
                text: Some("### Vendor outage".into()),
                citations: vec![],
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn daily_register_is_written_even_when_a_timeframe_fails() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let generator = ReportGenerator::new(FailsOnWeek, crate::profile::ScanProfile::headless());
        let d = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();

        let path = write_daily_register(&generator, &reports, d).await.unwrap();
        assert_eq!(path, reports.join("risk-register-2025-07-04.md"));

        let doc = std::fs::read_to_string(path).unwrap();
        assert!(doc.starts_with("# Daily Emerging Risk Register"));
        assert!(doc.contains("**Model:** gemini-2.5-flash"));
        assert_eq!(doc.matches("\n## ").count(), 5);
        assert_eq!(doc.matches("### Vendor outage").count(), 4);
        assert_eq!(
            doc.matches("*Error: Failed to generate scan for this timeframe.*").count(),
            1
        );
    }

    #[test]
    fn write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("daily");
        let d = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let path = write_register(&nested, d, "# Daily Emerging Risk Register\n").unwrap();
        assert_eq!(path, nested.join("risk-register-2025-07-04.md"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "# Daily Emerging Risk Register\n"
        );
    }
}
