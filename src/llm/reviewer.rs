use crate::llm::client::{LLMClient, LLMError};
use crate::llm::prompt::review_prompt;
use async_trait::async_trait;
use log::debug;
use thiserror::Error;

pub const NOTHING_TO_REVIEW: &str = "Nothing to review: there are no un-staged changes.";

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("The model returned an empty review")]
    EmptyFeedback,
}

/// Review commentary for a diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewFeedback {
    pub content: String,
}

impl ReviewFeedback {
    pub fn nothing_to_review() -> Self {
        Self {
            content: NOTHING_TO_REVIEW.to_string(),
        }
    }
}

/// Produces review feedback for a diff, focused by optional instructions
#[async_trait]
pub trait Review: Send + Sync {
    async fn review(
        &self,
        diff: &str,
        instructions: &[String],
    ) -> Result<ReviewFeedback, ReviewError>;
}

pub struct Reviewer {
    client: Box<dyn LLMClient>,
}

impl Reviewer {
    pub fn new(client: Box<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Review for Reviewer {
    async fn review(
        &self,
        diff: &str,
        instructions: &[String],
    ) -> Result<ReviewFeedback, ReviewError> {
        if diff.trim().is_empty() {
            debug!("Empty diff, skipping model call");
            return Ok(ReviewFeedback::nothing_to_review());
        }

        let prompt = review_prompt(diff, instructions);
        debug!("Review prompt:\n{}", prompt);

        let response = self.client.complete(&prompt).await?;
        debug!("Model response: {}", response);

        let content = response.trim();
        if content.is_empty() {
            return Err(ReviewError::EmptyFeedback);
        }

        Ok(ReviewFeedback {
            content: content.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingClient {
        response: String,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl LLMClient for RecordingClient {
        async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    fn reviewer(response: &str) -> (Reviewer, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let client = RecordingClient {
            response: response.to_string(),
            prompts: Arc::clone(&prompts),
        };
        (Reviewer::new(Box::new(client)), prompts)
    }

    #[tokio::test]
    async fn test_empty_diff_skips_model() {
        let (reviewer, prompts) = reviewer("should not be used");

        let feedback = reviewer.review("  \n", &[]).await.unwrap();
        assert_eq!(feedback, ReviewFeedback::nothing_to_review());
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_passes_instructions() {
        let (reviewer, prompts) = reviewer("  Looks good, rename `x`.  ");
        let instructions = vec!["naming".to_string()];

        let feedback = reviewer
            .review("diff --git a/src/lib.rs b/src/lib.rs\n+let x = 1;", &instructions)
            .await
            .unwrap();
        assert_eq!(feedback.content, "Looks good, rename `x`.");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- naming"));
        assert!(prompts[0].contains("+let x = 1;"));
    }

    #[tokio::test]
    async fn test_blank_model_reply_is_an_error() {
        let (reviewer, _) = reviewer("   ");

        let result = reviewer.review("+change", &[]).await;
        assert!(matches!(result, Err(ReviewError::EmptyFeedback)));
    }
}
