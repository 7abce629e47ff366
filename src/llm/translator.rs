use crate::llm::client::{LLMClient, LLMError};
use crate::llm::prompt::translation_prompt;
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Nothing to translate")]
    EmptyQuery,

    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Response doesn't look like a git command: {0}")]
    NotAGitCommand(String),
}

/// A command suggested for one natural-language request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSuggestion {
    pub command: String,
    pub description: String,
    pub explanation: Option<String>,
}

/// Turns a natural-language request into a command suggestion
#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(
        &self,
        query: &str,
        want_explanation: bool,
    ) -> Result<CommandSuggestion, TranslationError>;
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuggestion {
    command: String,
    description: String,
    #[serde(default)]
    explanation: Option<String>,
}

pub struct Translator {
    client: Box<dyn LLMClient>,
}

impl Translator {
    pub fn new(client: Box<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Parse the model's reply into a suggestion.
    ///
    /// The reply must be a JSON object with `command` and `description`
    /// (and `explanation` when one was requested), optionally wrapped in a
    /// markdown code fence. Anything else is rejected.
    pub fn parse_suggestion(
        response: &str,
        want_explanation: bool,
    ) -> Result<CommandSuggestion, TranslationError> {
        let body = strip_code_fence(response);

        let raw: RawSuggestion = serde_json::from_str(body)
            .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

        let command = raw.command.trim();
        let description = raw.description.trim();

        if command.is_empty() {
            return Err(TranslationError::MalformedResponse(
                "empty command".to_string(),
            ));
        }
        if command.contains('\n') {
            return Err(TranslationError::MalformedResponse(
                "command spans multiple lines".to_string(),
            ));
        }
        if description.is_empty() {
            return Err(TranslationError::MalformedResponse(
                "empty description".to_string(),
            ));
        }
        if !command.starts_with("git ") {
            return Err(TranslationError::NotAGitCommand(command.to_string()));
        }

        let explanation = if want_explanation {
            let explanation = raw
                .explanation
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .ok_or_else(|| {
                    TranslationError::MalformedResponse("missing explanation".to_string())
                })?;
            Some(explanation)
        } else {
            None
        };

        Ok(CommandSuggestion {
            command: command.to_string(),
            description: description.to_string(),
            explanation,
        })
    }
}

#[async_trait]
impl Translate for Translator {
    async fn translate(
        &self,
        query: &str,
        want_explanation: bool,
    ) -> Result<CommandSuggestion, TranslationError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TranslationError::EmptyQuery);
        }

        let prompt = translation_prompt(query, want_explanation);
        debug!("Translation prompt:\n{}", prompt);

        let response = self.client.complete(&prompt).await?;
        debug!("Model response: {}", response);

        Self::parse_suggestion(&response, want_explanation)
    }
}

/// Strip a surrounding markdown code fence (```json ... ``` or ``` ... ```)
fn strip_code_fence(response: &str) -> &str {
    let mut cleaned = response.trim();

    if cleaned.starts_with("```") {
        // Remove opening ```json or ```
        match cleaned.find('\n') {
            Some(first_newline) => cleaned = &cleaned[first_newline + 1..],
            None => cleaned = cleaned.trim_start_matches('`'),
        }
        // Remove closing ```
        if let Some(last_backticks) = cleaned.rfind("```") {
            cleaned = &cleaned[..last_backticks];
        }
        cleaned = cleaned.trim();
    }

    cleaned
}
