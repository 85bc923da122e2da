//! Runtime configuration loaded from file and environment.
//!
//! | Source | Example |
//! |--------|---------|
//! | Defaults | see [`ScoutConfig::load`] |
//! | TOML file | `AUDITSCOUT_CONFIG` path, else `config/auditscout.toml` (optional) |
//! | Environment | `AUDITSCOUT__PORT=9000`, `AUDITSCOUT__PROMPT_VARIANT=northwestern_mutual` |
//!
//! The Gemini key is read separately ([`gemini_api_key`]) so it never lands in a file.

use crate::error::ScoutResult;
use crate::gemini::GEMINI_API_BASE;
use crate::github::GITHUB_API_BASE;
use crate::prompts::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    /// Directory of the Sled settings store.
    pub storage_path: String,
    /// Output directory for headless registers.
    pub reports_dir: String,
    pub gemini_api_base: String,
    pub github_api_base: String,
    /// Prompt variant for the dashboard profile; unknown names fall back to the default.
    #[serde(default)]
    pub prompt_variant: Option<String>,
}

impl ScoutConfig {
    /// Load config. Precedence: environment > config file > defaults.
    pub fn load() -> ScoutResult<Self> {
        let config_path =
            std::env::var("AUDITSCOUT_CONFIG").unwrap_or_else(|_| "config/auditscout.toml".to_string());
        let builder = config::Config::builder()
            .set_default("app_name", "AuditScout AI")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000_i64)?
            .set_default("storage_path", "./data/auditscout_settings")?
            .set_default("reports_dir", "./reports")?
            .set_default("gemini_api_base", GEMINI_API_BASE)?
            .set_default("github_api_base", GITHUB_API_BASE)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("AUDITSCOUT").separator("__"))
            .build()?;

        Ok(built.try_deserialize()?)
    }

    /// The configured prompt variant, if it names a known one.
    pub fn prompt_template(&self) -> Option<&'static PromptTemplate> {
        let name = self.prompt_variant.as_deref()?;
        let found = PromptTemplate::by_name(name);
        if found.is_none() {
            tracing::warn!(variant = %name, "unknown prompt variant; using profile default");
        }
        found
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Gemini key: `GEMINI_API_KEY`, then `API_KEY`. Blank values count as absent.
pub fn gemini_api_key() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_variant(v: Option<&str>) -> ScoutConfig {
        ScoutConfig {
            app_name: "Test".into(),
            host: "127.0.0.1".into(),
            port: 8000,
            storage_path: "./data".into(),
            reports_dir: "./reports".into(),
            gemini_api_base: GEMINI_API_BASE.into(),
            github_api_base: GITHUB_API_BASE.into(),
            prompt_variant: v.map(String::from),
        }
    }

    #[test]
    fn prompt_variant_resolves_known_names_only() {
        assert!(config_with_variant(None).prompt_template().is_none());
        assert!(config_with_variant(Some("nope")).prompt_template().is_none());
        assert_eq!(
            config_with_variant(Some("northwestern_mutual"))
                .prompt_template()
                .map(|t| t.name),
            Some("northwestern_mutual")
        );
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        assert_eq!(config_with_variant(None).bind_addr(), "127.0.0.1:8000");
    }
}
