use crate::config::LLMConfig;
use crate::llm::client::{send_with_retry, LLMClient, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Anthropic messages API
pub struct AnthropicClient {
    api_key: String,
    model: String,
    endpoint: String,
    max_retries: u32,
    http_client: Client,
}

impl AnthropicClient {
    pub fn from_config(config: &LLMConfig, api_key: String) -> Result<Self, LLMError> {
        let http_client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            api_key,
            model: config.model().to_string(),
            endpoint: format!("{}{}", config.base_url().trim_end_matches('/'), MESSAGES_PATH),
            max_retries: config.max_retries,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Concatenate the text blocks of a response, skipping non-text blocks
    fn extract_text(response: AnthropicResponse) -> Result<String, LLMError> {
        let text: String = response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(LLMError::InvalidResponse(
                "No content in response".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens: 1024,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = send_with_retry(
            || {
                self.http_client
                    .post(&self.endpoint)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&request_body)
            },
            self.max_retries,
        )
        .await?;

        let body = response.text().await?;
        let parsed: AnthropicResponse = serde_json::from_str(&body)?;
        Self::extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Provider};

    #[test]
    fn test_endpoint_from_config() {
        let mut config = Config::default();
        config.llm.provider = Provider::Anthropic;
        let client = AnthropicClient::from_config(&config.llm, "test-key".to_string()).unwrap();
        assert_eq!(client.endpoint(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_extract_text_joins_blocks() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"git "},{"type":"text","text":"status"}]}"#,
        )
        .unwrap();
        assert_eq!(AnthropicClient::extract_text(response).unwrap(), "git status");
    }

    #[test]
    fn test_extract_text_empty() {
        let response: AnthropicResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(
            AnthropicClient::extract_text(response),
            Err(LLMError::InvalidResponse(_))
        ));
    }
}
