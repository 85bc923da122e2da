//! Named scan configurations. The dashboard and the headless run deliberately use
//! different models, temperatures, pauses and prompt variants.

use crate::prompts::{PromptTemplate, GENERAL, NORTHWESTERN_MUTUAL};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanProfile {
    pub name: &'static str,
    pub model: &'static str,
    pub temperature: f32,
    /// Fixed pause before each generation call (upstream rate limits).
    pub pause: Duration,
    pub template: &'static PromptTemplate,
    /// Content used when the service returns no text.
    pub empty_placeholder: &'static str,
}

impl ScanProfile {
    /// Interactive dashboard scan.
    pub fn dashboard() -> Self {
        Self {
            name: "dashboard",
            model: "gemini-2.5-pro",
            temperature: 0.3,
            pause: Duration::from_millis(500),
            template: &GENERAL,
            empty_placeholder: "No content generated.",
        }
    }

    /// Unattended scheduled scan.
    pub fn headless() -> Self {
        Self {
            name: "headless",
            model: "gemini-2.5-flash",
            temperature: 0.2,
            pause: Duration::from_millis(2000),
            template: &NORTHWESTERN_MUTUAL,
            empty_placeholder: "No significant risks identified.",
        }
    }

    /// Swap the prompt variant (selected once at startup from configuration).
    pub fn with_template(mut self, template: &'static PromptTemplate) -> Self {
        self.template = template;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_stay_distinct() {
        let d = ScanProfile::dashboard();
        let h = ScanProfile::headless();
        assert_ne!(d.model, h.model);
        assert!(h.pause > d.pause);
        assert_eq!(d.template.name, "general");
        assert_eq!(h.template.name, "northwestern_mutual");
    }

    #[test]
    fn with_template_only_changes_the_prompt() {
        let p = ScanProfile::dashboard().with_template(&NORTHWESTERN_MUTUAL);
        assert_eq!(p.template.name, "northwestern_mutual");
        assert_eq!(p.model, "gemini-2.5-pro");
    }
}
