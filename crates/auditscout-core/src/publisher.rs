//! Publisher: assembles completed report items into one Markdown document and upserts
//! it into a GitHub repository.

use crate::error::{ScoutError, ScoutResult};
use crate::markdown::dashboard_document;
use crate::report::ReportItem;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// User-supplied GitHub target. Treated as an opaque credential bundle by the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl PublishConfig {
    pub const DEFAULT_PATH: &'static str = "risks/daily-report.md";

    pub fn is_complete(&self) -> bool {
        [&self.token, &self.owner, &self.repo, &self.path]
            .iter()
            .all(|f| !f.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    #[default]
    Idle,
    Success,
    Error,
}

/// Outcome shown by the presentation layer after a publish attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub status: PublishState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PublishResult {
    pub fn success(url: String) -> Self {
        Self {
            status: PublishState::Success,
            url: Some(url),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: PublishState::Error,
            url: None,
            message: Some(message),
        }
    }
}

impl From<&ScoutResult<String>> for PublishResult {
    fn from(result: &ScoutResult<String>) -> Self {
        match result {
            Ok(url) => Self::success(url.clone()),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Remote file store with create-or-update semantics keyed by a version marker.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Version marker of the file at `config.path`, or `None` when it does not exist.
    async fn current_version(&self, config: &PublishConfig) -> ScoutResult<Option<String>>;

    /// Write `content` at `config.path`; `version` must be the marker from
    /// [`ContentStore::current_version`] when updating. Returns the file's web URL.
    async fn write(
        &self,
        config: &PublishConfig,
        content: &str,
        message: &str,
        version: Option<&str>,
    ) -> ScoutResult<String>;
}

#[async_trait::async_trait]
impl<T: ContentStore + ?Sized> ContentStore for std::sync::Arc<T> {
    async fn current_version(&self, config: &PublishConfig) -> ScoutResult<Option<String>> {
        (**self).current_version(config).await
    }

    async fn write(
        &self,
        config: &PublishConfig,
        content: &str,
        message: &str,
        version: Option<&str>,
    ) -> ScoutResult<String> {
        (**self).write(config, content, message, version).await
    }
}

pub struct Publisher<C> {
    store: C,
}

impl<C: ContentStore> Publisher<C> {
    pub fn new(store: C) -> Self {
        Self { store }
    }

    /// Publish the completed items. Rejects before any network call when there are none.
    pub async fn publish(&self, config: &PublishConfig, items: &[ReportItem]) -> ScoutResult<String> {
        if !items.iter().any(|r| r.is_completed()) {
            return Err(ScoutError::NothingToPublish);
        }
        if !config.is_complete() {
            return Err(ScoutError::MissingCredential("GitHub configuration"));
        }

        let now = Utc::now();
        let document = dashboard_document(items, now);
        let message = format!("Update emerging risk register ({})", now.format("%Y-%m-%d"));

        let version = self.store.current_version(config).await?;
        tracing::info!(
            owner = %config.owner,
            repo = %config.repo,
            path = %config.path,
            update = version.is_some(),
            "publishing report"
        );
        let url = self
            .store
            .write(config, &document, &message, version.as_deref())
            .await?;
        tracing::info!(url = %url, "report published");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_completeness() {
        let mut c = PublishConfig {
            token: "t".into(),
            owner: "o".into(),
            repo: "r".into(),
            path: PublishConfig::DEFAULT_PATH.into(),
        };
        assert!(c.is_complete());
        c.owner = " ".into();
        assert!(!c.is_complete());
    }

    #[test]
    fn publish_result_from_outcome() {
        let ok: ScoutResult<String> = Ok("https://github.com/o/r/blob/main/x.md".into());
        let r = PublishResult::from(&ok);
        assert_eq!(r.status, PublishState::Success);
        assert!(r.message.is_none());

        let err: ScoutResult<String> = Err(ScoutError::Publish("Bad credentials".into()));
        let r = PublishResult::from(&err);
        assert_eq!(r.status, PublishState::Error);
        assert_eq!(r.message.as_deref(), Some("Bad credentials"));

        let json = serde_json::to_value(PublishResult::default()).unwrap();
        assert_eq!(json, serde_json::json!({"status": "idle"}));
    }
}
