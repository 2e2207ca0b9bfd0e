use crate::api::{first_line, read_success_body, title_prompt, ApiError, TitleGenerator};
use crate::constants::{AI_REQUEST_TIMEOUT, AI_TEMPERATURE};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Google Gemini `generateContent` endpoint.
pub struct GeminiProvider {
    client: Client,
    pub model: String,
    pub base_url: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(model: String, base_url: String, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(AI_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_text(body: &str) -> Result<String, ApiError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::Response(format!("Malformed Gemini response: {}", e)))?;

    parsed
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .find_map(|t| first_line(&t))
        .ok_or_else(|| ApiError::Response("Gemini response contained no text".to_string()))
}

#[async_trait]
impl TitleGenerator for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate_title(&self, content: &str) -> Result<String, ApiError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ApiError::Config(
                "Gemini API key is not set. Export GEMINI_API_KEY or add it in Settings."
                    .to_string(),
            )
        })?;

        tracing::debug!("Requesting title from Gemini model {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&json!({
                "contents": [{ "parts": [{ "text": title_prompt(content) }] }],
                "generationConfig": { "temperature": AI_TEMPERATURE }
            }))
            .send()
            .await
            // the request URL carries the key
            .map_err(|e| ApiError::HttpClient(e.without_url()))?;

        let body = read_success_body("Gemini", response).await?;
        let title = extract_text(&body)?;
        tracing::debug!("Gemini title: {}", title);
        Ok(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve_once;

    const REPLY: &str = r#"{
      "candidates": [
        { "content": { "parts": [ { "text": "grocery-list\n" } ], "role": "model" },
          "finishReason": "STOP" }
      ]
    }"#;

    #[test]
    fn test_extract_text_from_candidate() {
        assert_eq!(extract_text(REPLY).unwrap(), "grocery-list");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let err = extract_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap_err();
        assert!(err.to_string().contains("no text"));
    }

    #[test]
    fn test_extract_text_malformed() {
        let err = extract_text("<html>oops</html>").unwrap_err();
        assert!(err.to_string().contains("Malformed"));
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let provider = GeminiProvider::new("m".into(), "http://127.0.0.1:9".into(), None);
        let err = provider.generate_title("notes").await.unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_reveal_key() {
        let provider = GeminiProvider::new(
            "gemini-2.0-flash".into(),
            "http://127.0.0.1:9/v1beta".into(),
            Some("SECRET-KEY-123".into()),
        );

        let err = provider.generate_title("notes").await.unwrap_err();
        assert!(matches!(err, ApiError::HttpClient(_)));

        let (_, warning) = crate::save::resolve_title(Err(err)).unwrap();
        let warning = warning.unwrap();
        assert!(!warning.contains("SECRET-KEY-123"), "{}", warning);
        assert!(!warning.contains("key="), "{}", warning);
    }

    #[tokio::test]
    async fn test_generate_title_round_trip() {
        let (base_url, server) = serve_once("200 OK", REPLY.to_string()).await;
        let provider = GeminiProvider::new(
            "gemini-2.0-flash".into(),
            format!("{}/v1beta/", base_url),
            Some("secret".into()),
        );

        let title = provider.generate_title("milk \"2%\"\neggs").await.unwrap();
        assert_eq!(title, "grocery-list");

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "POST /v1beta/models/gemini-2.0-flash:generateContent?key=secret HTTP/1.1"
        ));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        let text = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.ends_with("Notes: milk \"2%\"\neggs"));
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_body() {
        let (base_url, _server) =
            serve_once("403 Forbidden", r#"{"error":"bad key"}"#.to_string()).await;
        let provider = GeminiProvider::new("m".into(), base_url, Some("k".into()));

        let err = provider.generate_title("x").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("403"), "{}", msg);
        assert!(msg.contains("bad key"), "{}", msg);
    }
}
