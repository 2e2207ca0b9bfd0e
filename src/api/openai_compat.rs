use crate::api::{
    first_line, read_success_body, title_prompt, ApiError, Message, MessageRole, TitleGenerator,
};
use crate::constants::{AI_REQUEST_TIMEOUT, AI_TEMPERATURE};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Any service speaking the OpenAI chat-completions dialect.
pub struct OpenAiCompatibleProvider {
    client: Client,
    pub name: String,
    pub model: String,
    pub base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: String, model: String, base_url: String, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(AI_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            name,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl TitleGenerator for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_title(&self, content: &str) -> Result<String, ApiError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(ApiError::Config(format!("{} API key is missing", self.name)));
        };

        let url = format!("{}/chat/completions", self.base_url);
        let messages = vec![Message {
            role: MessageRole::User,
            content: title_prompt(content),
        }];

        let response = self
            .client
            .post(url)
            .bearer_auth(key)
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "stream": false,
                "temperature": AI_TEMPERATURE
            }))
            .send()
            .await?;

        let body = read_success_body(&self.name, response).await?;
        let reply: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::Response(format!("Malformed {} response: {}", self.name, e))
        })?;

        reply
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .find_map(|t| first_line(&t))
            .ok_or_else(|| ApiError::Response(format!("{} returned no title", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve_once;

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let provider =
            OpenAiCompatibleProvider::new("OpenAI".into(), "m".into(), "http://127.0.0.1:9".into(), None);
        let err = provider.generate_title("x").await.unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn test_generate_title_sends_bearer_token() {
        let reply = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"meeting-notes"}}]}"#;
        let (base_url, server) = serve_once("200 OK", reply.to_string()).await;
        let provider = OpenAiCompatibleProvider::new(
            "OpenAI".into(),
            "gpt-4o-mini".into(),
            format!("{}/v1", base_url),
            Some("sk-test".into()),
        );

        assert_eq!(provider.generate_title("agenda").await.unwrap(), "meeting-notes");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-test"));
    }

    #[tokio::test]
    async fn test_no_choices_is_an_error() {
        let (base_url, _server) = serve_once("200 OK", r#"{"choices":[]}"#.to_string()).await;
        let provider = OpenAiCompatibleProvider::new(
            "OpenAI".into(),
            "m".into(),
            base_url,
            Some("k".into()),
        );
        let err = provider.generate_title("x").await.unwrap_err();
        assert!(err.to_string().contains("no title"));
    }
}
