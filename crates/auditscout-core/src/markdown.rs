//! Markdown assembly for published and headless reports.

use crate::report::{Citation, ReportItem, ReportStatus};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Document published from the dashboard: completed items only, timeframe order.
pub fn dashboard_document(items: &[ReportItem], generated_at: DateTime<Utc>) -> String {
    let mut completed: Vec<&ReportItem> = items.iter().filter(|r| r.is_completed()).collect();
    completed.sort_by_key(|r| r.time_frame);

    let mut out = String::from("# Emerging Risk Register\n\n");
    let _ = writeln!(out, "**Generated:** {}\n", generated_at.format("%Y-%m-%d %H:%M UTC"));
    out.push_str("---\n\n");

    for item in completed {
        let _ = writeln!(out, "## {}\n", item.time_frame);
        push_content(&mut out, &item.content);

        let links = source_links(&item.sources, |c| c.display_title());
        if !links.is_empty() {
            out.push_str("### Sources\n\n");
            out.push_str(&links);
            out.push('\n');
        }
        out.push_str("---\n\n");
    }
    out
}

/// Daily register written by the headless run. Every timeframe gets a section;
/// failed ones are noted inline.
pub fn register_document(items: &[ReportItem], date: &str, model: &str) -> String {
    let mut ordered: Vec<&ReportItem> = items.iter().collect();
    ordered.sort_by_key(|r| r.time_frame);

    let mut out = String::from("# Daily Emerging Risk Register\n\n");
    let _ = writeln!(out, "**Date:** {}", date);
    let _ = writeln!(out, "**Model:** {}", model);
    out.push_str("**Generated By:** AuditScout AI (Automated Workflow)\n\n---\n\n");

    for item in ordered {
        let _ = writeln!(out, "## {}\n", item.time_frame);
        match item.status {
            ReportStatus::Completed => {
                push_content(&mut out, &item.content);
                let links = source_links(&item.sources, |c| {
                    let t = c.web.title.trim();
                    if t.is_empty() { "Source".to_string() } else { t.to_string() }
                });
                if !links.is_empty() {
                    out.push_str("**Sources:**\n");
                    out.push_str(&links);
                }
                out.push_str("\n---\n\n");
            }
            _ => {
                out.push_str("*Error: Failed to generate scan for this timeframe.*\n\n---\n\n");
            }
        }
    }
    out
}

/// Item content exactly as generated, closed off with a blank line.
fn push_content(out: &mut String, content: &str) {
    out.push_str(content);
    if !content.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
}

fn source_links(sources: &[Citation], title: impl Fn(&Citation) -> String) -> String {
    let mut out = String::new();
    for c in sources.iter().filter(|c| !c.uri().trim().is_empty()) {
        let _ = writeln!(out, "- [{}]({})", title(c), c.uri());
    }
    out
}
