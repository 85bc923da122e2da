//! Report Generator: one timeframe in, one normalised [`ReportItem`] out.

use crate::error::ScoutResult;
use crate::profile::ScanProfile;
use crate::prompts::build_prompt;
use crate::report::{Citation, ReportItem};
use crate::timeframe::Timeframe;
use chrono::NaiveDate;

/// Request sent to the generative service. Web search grounding is always on.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub web_search: bool,
}

/// Grounding citation as returned by the service; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCitation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub citations: Vec<RawCitation>,
}

/// External generative-AI collaborator (prompt in, text + citations out).
#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> ScoutResult<GenerationResponse>;
}

#[async_trait::async_trait]
impl<T: GenerationService + ?Sized> GenerationService for std::sync::Arc<T> {
    async fn generate(&self, request: GenerationRequest) -> ScoutResult<GenerationResponse> {
        (**self).generate(request).await
    }
}

/// Keep only citations with a usable URI; a missing title becomes empty.
pub fn normalize_citations(raw: Vec<RawCitation>) -> Vec<Citation> {
    raw.into_iter()
        .filter_map(|c| {
            let uri = c.uri?.trim().to_string();
            if uri.is_empty() {
                return None;
            }
            Some(Citation::new(uri, c.title.unwrap_or_default()))
        })
        .collect()
}

/// Builds the prompt for a timeframe, calls the service, and folds any failure into an
/// `error` item. Never returns an error to the orchestrator.
pub struct ReportGenerator<S> {
    service: S,
    profile: ScanProfile,
}

impl<S: GenerationService> ReportGenerator<S> {
    pub fn new(service: S, profile: ScanProfile) -> Self {
        Self { service, profile }
    }

    pub fn profile(&self) -> &ScanProfile {
        &self.profile
    }

    pub async fn generate(&self, timeframe: Timeframe, today: NaiveDate) -> ReportItem {
        let prompt = build_prompt(self.profile.template, timeframe, today);
        let request = GenerationRequest {
            model: self.profile.model.to_string(),
            prompt: prompt.text,
            temperature: self.profile.temperature,
            web_search: true,
        };

        match self.service.generate(request).await {
            Ok(response) => {
                let content = response
                    .text
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| self.profile.empty_placeholder.to_string());
                let sources = normalize_citations(response.citations);
                tracing::debug!(
                    timeframe = %timeframe,
                    sources = sources.len(),
                    "generation completed"
                );
                ReportItem::completed(timeframe, content, sources)
            }
            Err(e) => {
                tracing::error!(timeframe = %timeframe, error = %e, "generation failed");
                ReportItem::failed(timeframe, e.to_string())
            }
        }
    }
}
