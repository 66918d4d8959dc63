//! Menu recommendations from the Gemini API.
//!
//! Given the names of items that still have stock, asks the model for one
//! short, cheerful suggestion in Malay. The storefront never shows an error
//! for this: [`Recommender::recommend`] always returns displayable text.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::GeminiConfig;

/// Shown when the provider is unavailable or not configured.
pub const BUSY_MESSAGE: &str = "Maaf, Mommy tengah sibuk di dapur sekarang. Cuba lagi nanti ya!";

/// Shown when the provider answers with no text.
pub const EMPTY_MESSAGE: &str = "Pilih menu Mommy hari ini, semuanya sedap!";

/// Errors from the recommendation provider.
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// No API key configured.
    #[error("recommendations are not configured")]
    Disabled,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Gemini client for menu suggestions.
#[derive(Clone)]
pub struct Recommender {
    inner: Arc<RecommenderInner>,
}

struct RecommenderInner {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    model: String,
    endpoint: String,
}

impl Recommender {
    /// Create a new recommendation client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, RecommendationError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.as_str().trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            inner: Arc::new(RecommenderInner {
                client,
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                endpoint,
            }),
        })
    }

    /// Suggestion text for the given item names.
    ///
    /// Failures are logged and replaced with [`BUSY_MESSAGE`]; an empty answer
    /// becomes [`EMPTY_MESSAGE`].
    pub async fn recommend(&self, item_names: &[String]) -> String {
        match self.generate(item_names).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_MESSAGE.to_string(),
            Err(RecommendationError::Disabled) => {
                tracing::debug!("GEMINI_API_KEY not set, using static recommendation");
                BUSY_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation request failed");
                BUSY_MESSAGE.to_string()
            }
        }
    }

    /// Ask the model for a suggestion.
    ///
    /// Returns `Ok(None)` when the model produced no text.
    ///
    /// # Errors
    ///
    /// Returns error if no key is configured, the request fails, or the
    /// response cannot be parsed.
    #[instrument(skip(self, item_names), fields(model = %self.inner.model, items = item_names.len()))]
    pub async fn generate(
        &self,
        item_names: &[String],
    ) -> Result<Option<String>, RecommendationError> {
        let api_key = self
            .inner
            .api_key
            .as_ref()
            .ok_or(RecommendationError::Disabled)?;

        let prompt = prompt(item_names);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&request)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecommendationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RecommendationError::Parse(e.to_string()))?;

        Ok(body.text())
    }
}

fn prompt(item_names: &[String]) -> String {
    format!(
        "Berdasarkan menu berikut: {}. Berikan satu cadangan ringkas (max 30 patah perkataan) \
         menu mana yang sedap dimakan bersama atau cadangan untuk makan tengah hari. \
         Gunakan nada yang mesra dan ceria dalam Bahasa Melayu.",
        item_names.join(", ")
    )
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated; `None` if blank.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const TEST_KEY: &str = "AIzaSyD9f8Qk2LmZp4Rt7Vw1Xy3Bc6Nh0Jq5Ue";
    const GENERATE_PATH: &str = "/v1beta/models/gemini-3-flash-preview:generateContent";

    fn recommender(server: &MockServer, api_key: Option<&str>) -> Recommender {
        Recommender::new(&GeminiConfig {
            api_key: api_key.map(|k| SecretString::from(k.to_string())),
            model: "gemini-3-flash-preview".to_string(),
            base_url: server.uri().parse().unwrap(),
        })
        .unwrap()
    }

    fn names() -> Vec<String> {
        vec!["Nasi Lemak Ayam Berempah".to_string(), "Teh Tarik Kaw".to_string()]
    }

    #[tokio::test]
    async fn test_returns_model_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", TEST_KEY))
            .and(body_string_contains("Nasi Lemak Ayam Berempah, Teh Tarik Kaw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": " Cuba Nasi Lemak dengan Teh Tarik! " }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = recommender(&server, Some(TEST_KEY)).recommend(&names()).await;

        assert_eq!(text, "Cuba Nasi Lemak dengan Teh Tarik!");
    }

    #[tokio::test]
    async fn test_empty_answer_uses_default_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let text = recommender(&server, Some(TEST_KEY)).recommend(&names()).await;

        assert_eq!(text, EMPTY_MESSAGE);
    }

    #[tokio::test]
    async fn test_api_error_uses_busy_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let client = recommender(&server, Some(TEST_KEY));

        assert!(matches!(
            client.generate(&names()).await,
            Err(RecommendationError::Api { status: 429, .. })
        ));
        assert_eq!(client.recommend(&names()).await, BUSY_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let text = recommender(&server, None).recommend(&names()).await;

        assert_eq!(text, BUSY_MESSAGE);
    }

    #[test]
    fn test_prompt_lists_items() {
        let text = prompt(&names());
        assert!(text.starts_with("Berdasarkan menu berikut: Nasi Lemak Ayam Berempah, Teh Tarik Kaw."));
        assert!(text.contains("max 30 patah perkataan"));
    }
}
