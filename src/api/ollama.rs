use crate::api::{
    first_line, read_success_body, title_prompt, ApiError, Message, MessageRole, TitleGenerator,
};
use crate::constants::{AI_REQUEST_TIMEOUT, AI_TEMPERATURE};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Local Ollama server, via the non-streaming chat endpoint.
pub struct OllamaProvider {
    client: Client,
    pub model: String,
    pub base_url: String,
}

impl OllamaProvider {
    pub fn new(model: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(AI_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

#[async_trait]
impl TitleGenerator for OllamaProvider {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn generate_title(&self, content: &str) -> Result<String, ApiError> {
        let url = format!("{}/api/chat", self.base_url);
        let messages = vec![Message {
            role: MessageRole::User,
            content: title_prompt(content),
        }];

        let response = self
            .client
            .post(url)
            .json(&json!({
                "model": self.model,
                "messages": messages,
                "stream": false,
                "options": { "temperature": AI_TEMPERATURE }
            }))
            .send()
            .await?;

        let body = read_success_body("Ollama", response).await?;
        let reply: OllamaChatResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Response(format!("Malformed Ollama response: {}", e)))?;

        first_line(&reply.message.content)
            .ok_or_else(|| ApiError::Response("Ollama returned an empty title".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::serve_once;

    #[tokio::test]
    async fn test_generate_title_from_chat_reply() {
        let reply = r#"{"model":"qwen2.5:0.5b","message":{"role":"assistant","content":"dream-journal"},"done":true}"#;
        let (base_url, server) = serve_once("200 OK", reply.to_string()).await;
        let provider = OllamaProvider::new("qwen2.5:0.5b".into(), base_url);

        assert_eq!(provider.generate_title("I was flying").await.unwrap(), "dream-journal");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat HTTP/1.1"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let reply = r#"{"message":{"role":"assistant","content":"  \n"}}"#;
        let (base_url, _server) = serve_once("200 OK", reply.to_string()).await;
        let provider = OllamaProvider::new("m".into(), base_url);

        let err = provider.generate_title("x").await.unwrap_err();
        assert!(matches!(err, ApiError::Response(_)));
    }
}
