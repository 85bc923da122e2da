//! AuditScout core library.
//! Multi-timeframe emerging-risk scans, prompt templates, report board, and GitHub publishing.

pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod github;
pub mod headless;
pub mod markdown;
pub mod orchestrator;
pub mod profile;
pub mod prompts;
pub mod publisher;
pub mod report;
pub mod settings;
pub mod timeframe;

pub use config::{gemini_api_key, ScoutConfig};
pub use error::{ScoutError, ScoutResult};
pub use gemini::GeminiClient;
pub use generator::{
    GenerationRequest, GenerationResponse, GenerationService, RawCitation, ReportGenerator,
};
pub use github::GitHubClient;
pub use orchestrator::{ScanRun, ScanSession, ScanSnapshot};
pub use profile::ScanProfile;
pub use prompts::{build_prompt, BuiltPrompt, PromptTemplate};
pub use publisher::{ContentStore, PublishConfig, PublishResult, PublishState, Publisher};
pub use report::{
    BoardAction, Citation, MalformedBoard, ReportBoard, ReportItem, ReportStatus, ScanStatus,
};
pub use settings::SettingsStore;
pub use timeframe::Timeframe;
