use crate::config::LLMConfig;
use crate::llm::client::{send_with_retry, LLMClient, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for OpenAI-compatible chat completion endpoints
pub struct OpenAIClient {
    api_key: String,
    model: String,
    endpoint: String,
    max_retries: u32,
    http_client: Client,
}

impl OpenAIClient {
    pub fn from_config(config: &LLMConfig, api_key: String) -> Result<Self, LLMError> {
        let http_client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            api_key,
            model: config.model().to_string(),
            endpoint: format!(
                "{}{}",
                config.base_url().trim_end_matches('/'),
                CHAT_COMPLETIONS_PATH
            ),
            max_retries: config.max_retries,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn extract_text(response: ChatResponse) -> Result<String, LLMError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| LLMError::InvalidResponse("No content in response".to_string()))
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let request_body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = send_with_retry(
            || {
                self.http_client
                    .post(&self.endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&request_body)
            },
            self.max_retries,
        )
        .await?;

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        Self::extract_text(parsed)
    }
}
