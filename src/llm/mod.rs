pub mod anthropic;
pub mod client;
pub mod openai;
pub mod prompt;
pub mod reviewer;
pub mod translator;

pub use anthropic::AnthropicClient;
pub use client::{LLMClient, LLMError};
pub use openai::OpenAIClient;
pub use reviewer::{Review, ReviewError, ReviewFeedback, Reviewer};
pub use translator::{CommandSuggestion, Translate, TranslationError, Translator};

use crate::config::{LLMConfig, Provider};

/// Build the client for the configured provider
pub fn build_client(config: &LLMConfig, api_key: String) -> Result<Box<dyn LLMClient>, LLMError> {
    let client: Box<dyn LLMClient> = match config.provider {
        Provider::OpenAI => Box::new(OpenAIClient::from_config(config, api_key)?),
        Provider::Anthropic => Box::new(AnthropicClient::from_config(config, api_key)?),
    };
    Ok(client)
}
