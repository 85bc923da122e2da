//! Prompt templates and the timeframe-aware prompt builder.

pub mod builder;
pub mod templates;

pub use builder::{build_prompt, BuiltPrompt, FALLBACK_SENTENCE};
pub use templates::{PromptTemplate, GENERAL, NORTHWESTERN_MUTUAL, TEMPLATES};
