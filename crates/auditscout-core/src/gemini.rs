//! Gemini client: `generateContent` with Google Search grounding, over reqwest.

use crate::error::{ScoutError, ScoutResult};
use crate::generator::{GenerationRequest, GenerationResponse, GenerationService, RawCitation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<GroundingWeb>,
}

#[derive(Debug, Deserialize)]
struct GroundingWeb {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Gemini REST client. Holds the API key; construction fails without one.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> ScoutResult<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ScoutError::MissingCredential("API Key"));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Ok(Self {
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait::async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> ScoutResult<GenerationResponse> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt,
                }],
            }],
            tools: if request.web_search {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        let res = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScoutError::Generation(format!("Gemini request failed: {}", e)))?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(ScoutError::Generation(api_error_message(status.as_u16(), &text)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| ScoutError::Generation(format!("Gemini response parse failed: {}", e)))?;
        Ok(into_generation_response(parsed))
    }
}

fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(b) => b.error.message,
        Err(_) if body.trim().is_empty() => format!("Gemini API error {}", status),
        Err(_) => format!("Gemini API error {}: {}", status, body.trim()),
    }
}

fn into_generation_response(parsed: GenerateContentResponse) -> GenerationResponse {
    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return GenerationResponse::default();
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .map(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .map(|web| RawCitation {
            uri: web.uri,
            title: web.title,
        })
        .collect();

    GenerationResponse {
        text: if text.is_empty() { None } else { Some(text) },
        citations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_missing_credential() {
        assert!(matches!(
            GeminiClient::new("   "),
            Err(ScoutError::MissingCredential(_))
        ));
    }

    #[test]
    fn request_body_enables_search_tool() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hi".into() }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: GenerationConfig { temperature: 0.2 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["tools"][0]["google_search"], serde_json::json!({}));
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert!(json["generationConfig"]["temperature"].as_f64().unwrap() > 0.19);
    }

    #[test]
    fn parses_text_and_grounding_chunks() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Risk "}, {"text": "A"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://x.test/a", "title": "Source A"}},
                    {"retrievedContext": {}},
                    {"web": {"uri": "https://x.test/b"}}
                ]}
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let out = into_generation_response(parsed);
        assert_eq!(out.text.as_deref(), Some("Risk A"));
        assert_eq!(out.citations.len(), 2);
        assert_eq!(out.citations[1].title, None);
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(into_generation_response(parsed), GenerationResponse::default());
    }

    #[test]
    fn api_error_prefers_service_message() {
        let body = r#"{"error": {"code": 429, "message": "rate limited", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(api_error_message(429, body), "rate limited");
        assert_eq!(api_error_message(502, ""), "Gemini API error 502");
        assert_eq!(api_error_message(500, "oops"), "Gemini API error 500: oops");
    }
}
