use crate::config::ProviderConfig;
use crate::constants::TITLE_PROMPT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub mod gemini;
pub mod ollama;
pub mod openai_compat;

use crate::api::gemini::GeminiProvider;
use crate::api::ollama::OllamaProvider;
use crate::api::openai_compat::OpenAiCompatibleProvider;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("API response error: {0}")]
    Response(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Summarizes note text into a short title.
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    fn name(&self) -> &str;
    async fn generate_title(&self, content: &str) -> Result<String, ApiError>;
}

pub fn create_generator(config: &ProviderConfig) -> Arc<dyn TitleGenerator> {
    match config.name.as_str() {
        "Gemini" => Arc::new(GeminiProvider::new(
            config.active_model.clone(),
            config.base_url.clone(),
            config.resolve_api_key(),
        )),
        "Ollama" => Arc::new(OllamaProvider::new(
            config.active_model.clone(),
            config.base_url.clone(),
        )),
        _ => Arc::new(OpenAiCompatibleProvider::new(
            config.name.clone(),
            config.active_model.clone(),
            config.base_url.clone(),
            config.resolve_api_key(),
        )),
    }
}

/// Full prompt sent for a note body.
pub fn title_prompt(content: &str) -> String {
    format!("{}{}", TITLE_PROMPT, content)
}

/// Reads a response body and turns non-2xx statuses into `ApiError::Response`.
pub(crate) async fn read_success_body(
    provider: &str,
    response: reqwest::Response,
) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!("{} response ({}): {}", provider, status, body);

    if !status.is_success() {
        return Err(ApiError::Response(format!(
            "{} API call failed with HTTP status {}. Response: {}",
            provider,
            status,
            body.trim()
        )));
    }
    Ok(body)
}

/// First non-empty line of a model reply, trimmed.
pub(crate) fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP server for provider tests.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves a single canned response and hands back the raw request text.
    pub async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }
}
