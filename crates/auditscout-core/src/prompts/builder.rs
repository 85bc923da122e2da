//! Builds the per-timeframe instruction string from a template variant.

use super::templates::PromptTemplate;
use crate::timeframe::{Horizon, Timeframe};
use chrono::NaiveDate;

/// Sentence the model must emit for a quiet Day / Week window.
pub const FALLBACK_SENTENCE: &str = "No major high-impact risk events detected";

/// Prompt text plus the date range it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub text: String,
    pub date_range: String,
    pub horizon: Horizon,
}

/// Build the prompt for `timeframe`, with the window ending on `today`.
pub fn build_prompt(template: &PromptTemplate, timeframe: Timeframe, today: NaiveDate) -> BuiltPrompt {
    let date_range = timeframe.date_range(today);
    let horizon = timeframe.horizon();
    let task = match horizon {
        Horizon::ShortTerm => template.short_term_task,
        Horizon::Trend => template.trend_task,
    };

    let relevance = match template.relevance_heading {
        Some(heading) => format!("**{}**:\n*   {}\n\n", heading, template.relevance_hint),
        None => String::new(),
    };

    let text = format!(
        "{role}\n\
Date Range: {date_range} ({timeframe}).\n\n\
{context}\n\n\
{task}\n\n\
REQUIRED OUTPUT FORMAT (Markdown):\n\
For each risk found (limit to top 3-5), use this exact structure:\n\n\
### [Risk Title]\n\
**Context**: [2-3 sentences explaining the event or trend]\n\n\
{relevance}\
**Implications for Audit**:\n\
*   [Specific audit action: e.g., \"Review supervisory controls,\" \"Audit model governance,\" \"Assess third-party vendor management\"]\n\n\
Constraints:\n\
- Do NOT be generic.\n\
- Cite real entities, laws, or events found in search.\n\
- Do NOT invent risks. Only report on information found via the search tool.\n\
- If no significant specific events occurred (for Day/Week), state \"{fallback}\" but provide 1 minor observation.\n",
        role = template.role,
        date_range = date_range,
        timeframe = timeframe,
        context = template.domain_context,
        task = task,
        relevance = relevance,
        fallback = FALLBACK_SENTENCE,
    );

    BuiltPrompt {
        text,
        date_range,
        horizon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::templates::{GENERAL, NORTHWESTERN_MUTUAL, TEMPLATES};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn every_variant_and_timeframe_carries_output_contract() {
        for template in TEMPLATES {
            for tf in Timeframe::ALL {
                let p = build_prompt(template, tf, today());
                assert!(p.text.contains("### [Risk Title]"), "{} / {}", template.name, tf);
                assert!(p.text.contains("**Context**"), "{} / {}", template.name, tf);
                assert!(p.text.contains("**Implications for Audit**"), "{} / {}", template.name, tf);
                assert!(p.text.contains(FALLBACK_SENTENCE));
                assert!(p.text.contains("Cite real entities"));
            }
        }
    }

    #[test]
    fn short_term_asks_for_events_and_trend_for_themes() {
        let day = build_prompt(&GENERAL, Timeframe::Day, today());
        assert_eq!(day.horizon, Horizon::ShortTerm);
        assert!(day.text.contains("recent EVENTS"));
        assert!(!day.text.contains("broad TRENDS"));

        let year = build_prompt(&GENERAL, Timeframe::Year, today());
        assert_eq!(year.horizon, Horizon::Trend);
        assert!(year.text.contains("broad TRENDS"));
        assert!(!year.text.contains("recent EVENTS"));
    }

    #[test]
    fn embeds_date_range_and_label() {
        let p = build_prompt(&GENERAL, Timeframe::Week, today());
        assert_eq!(p.date_range, "from 6/23/2025 to 6/30/2025");
        assert!(p.text.contains("Date Range: from 6/23/2025 to 6/30/2025 (Past Week)."));
    }

    #[test]
    fn relevance_section_only_for_organisation_variants() {
        let general = build_prompt(&GENERAL, Timeframe::Month, today());
        assert!(!general.text.contains("**Relevance to"));

        let nm = build_prompt(&NORTHWESTERN_MUTUAL, Timeframe::Month, today());
        assert!(nm.text.contains("**Relevance to Northwestern Mutual**"));
        assert!(nm.text.contains("Career Agency"));
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let a = build_prompt(&NORTHWESTERN_MUTUAL, Timeframe::Quarter, today());
        let b = build_prompt(&NORTHWESTERN_MUTUAL, Timeframe::Quarter, today());
        assert_eq!(a, b);
    }
}
