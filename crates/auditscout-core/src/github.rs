//! GitHub Contents API client used for publishing.
//!
//! Lookup: `GET /repos/{owner}/{repo}/contents/{path}` answers 200 with the blob `sha`
//! or 404. Write: `PUT` on the same URL with base64 content, carrying the `sha` only
//! when updating an existing file.

use crate::error::{ScoutError, ScoutResult};
use crate::publisher::{ContentStore, PublishConfig};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: String,
}

#[derive(Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: Option<PutContentsFile>,
}

#[derive(Debug, Deserialize)]
struct PutContentsFile {
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("AuditScout/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_base: GITHUB_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn request(
        &self,
        method: reqwest::Method,
        config: &PublishConfig,
    ) -> ScoutResult<reqwest::RequestBuilder> {
        let url = contents_url(&self.api_base, config)?;
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(config.token.trim())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28"))
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

fn contents_url(api_base: &str, config: &PublishConfig) -> ScoutResult<String> {
    let invalid = || ScoutError::Publish(format!("Invalid GitHub API base: {}", api_base));
    let mut url = url::Url::parse(api_base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(["repos", config.owner.trim(), config.repo.trim(), "contents"])
        .extend(config.path.split('/').map(str::trim).filter(|s| !s.is_empty()));
    Ok(url.into())
}

async fn error_message(action: &str, res: reqwest::Response) -> ScoutError {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<GitHubErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or_else(|_| status.to_string());
    ScoutError::Publish(format!("GitHub {} failed ({}): {}", action, status.as_u16(), detail))
}

#[async_trait::async_trait]
impl ContentStore for GitHubClient {
    async fn current_version(&self, config: &PublishConfig) -> ScoutResult<Option<String>> {
        let res = self
            .request(reqwest::Method::GET, config)?
            .send()
            .await
            .map_err(|e| ScoutError::Publish(format!("GitHub request failed: {}", e)))?;

        match res.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let entry: ContentsEntry = res
                    .json()
                    .await
                    .map_err(|e| ScoutError::Publish(format!("Unexpected GitHub response: {}", e)))?;
                Ok(Some(entry.sha))
            }
            _ => Err(error_message("lookup", res).await),
        }
    }

    async fn write(
        &self,
        config: &PublishConfig,
        content: &str,
        message: &str,
        version: Option<&str>,
    ) -> ScoutResult<String> {
        let body = PutContentsRequest {
            message,
            content: BASE64.encode(content.as_bytes()),
            sha: version,
        };
        let res = self
            .request(reqwest::Method::PUT, config)?
            .json(&body)
            .send()
            .await
            .map_err(|e| ScoutError::Publish(format!("GitHub request failed: {}", e)))?;

        if !res.status().is_success() {
            return Err(error_message("write", res).await);
        }

        let parsed: PutContentsResponse = res
            .json()
            .await
            .map_err(|e| ScoutError::Publish(format!("Unexpected GitHub response: {}", e)))?;
        parsed
            .content
            .and_then(|c| c.html_url)
            .ok_or_else(|| ScoutError::Publish("GitHub response had no file URL".to_string()))
    }
}
