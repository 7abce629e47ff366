//! The decision loop: translate a request, classify the suggestion, ask for
//! confirmation when it is destructive, then run it. Review mode gathers the
//! working tree diff and prints the model's feedback instead.

use crate::audit::AuditLogger;
use crate::error::{AppError, AppResult};
use crate::git::{split_command, ExecutionError, RunCommand};
use crate::llm::{CommandSuggestion, Review, Translate, TranslationError};
use crate::security::{classify, Verdict};
use crate::ui::output::{
    print_command, print_description, print_explanation, print_review, print_warning,
};
use crate::ui::{is_affirmative, ConfirmPrompt, OutputStream};
use log::{debug, warn};
use std::io::Write;

const DIFF_COMMAND: &[&str] = &["git", "diff"];

pub const CONFIRM_QUESTION: &str = "Do you wish to continue? (Y/N): ";
pub const STOPPED_MESSAGE: &str = "Execution stopped.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Translating,
    Classifying,
    AwaitingConfirmation,
    Executing,
    Reviewing,
    Done,
    Aborted,
    Error,
}

/// How a run ended
#[derive(Debug)]
pub enum Outcome {
    Executed { command: String },
    /// The command ran but failed; the error was already shown to the user
    ExecutionFailed(ExecutionError),
    /// The user declined a destructive command
    Aborted,
    Reviewed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::ExecutionFailed(_))
    }
}

/// Permission to run a suggestion. Only obtainable from a safe verdict or
/// an affirmative answer at the prompt.
#[derive(Debug)]
enum Clearance {
    Safe,
    Confirmed,
}

pub struct Orchestrator<W, P> {
    runner: Box<dyn RunCommand>,
    out: W,
    prompt: P,
    audit: Option<AuditLogger>,
    state: State,
}

impl<W: OutputStream, P: ConfirmPrompt> Orchestrator<W, P> {
    pub fn new(runner: Box<dyn RunCommand>, out: W, prompt: P) -> Self {
        Self {
            runner,
            out,
            prompt,
            audit: None,
            state: State::Idle,
        }
    }

    /// Record executed and declined commands in a history log
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Translate one request and run the suggested command, asking first when
    /// the command is destructive.
    pub async fn handle_request(
        &mut self,
        translator: &dyn Translate,
        query: &str,
        explain: bool,
    ) -> AppResult<Outcome> {
        if query.trim().is_empty() {
            return Err(TranslationError::EmptyQuery.into());
        }

        self.transition(State::Translating);
        let suggestion = match translator.translate(query, explain).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                self.transition(State::Error);
                return Err(e.into());
            }
        };
        debug!("Suggestion: {:?}", suggestion);

        // Shown before any prompt or execution
        self.present(&suggestion)?;

        self.transition(State::Classifying);
        let verdict = classify(&suggestion.command);
        debug!("Verdict: {:?}", verdict);

        let clearance = if verdict.is_destructive {
            self.transition(State::AwaitingConfirmation);
            match self.confirm(&verdict)? {
                Some(clearance) => clearance,
                None => {
                    self.decline(&suggestion, &verdict)?;
                    return Ok(Outcome::Aborted);
                }
            }
        } else {
            Clearance::Safe
        };

        self.execute(&suggestion, &verdict, clearance)
    }

    /// Review the un-staged changes, focused by `instructions`
    pub async fn handle_review(
        &mut self,
        reviewer: &dyn Review,
        instructions: &[String],
    ) -> AppResult<Outcome> {
        self.transition(State::Reviewing);

        let argv: Vec<String> = DIFF_COMMAND.iter().map(|s| s.to_string()).collect();
        let result = match self.runner.run(&argv) {
            Ok(diff) => reviewer
                .review(&diff, instructions)
                .await
                .map_err(AppError::from),
            Err(e) => Err(e.into()),
        };

        let feedback = match result {
            Ok(feedback) => feedback,
            Err(e) => {
                self.transition(State::Error);
                return Err(e);
            }
        };

        print_review(&mut self.out, &feedback.content)?;
        self.out.flush()?;

        self.transition(State::Done);
        Ok(Outcome::Reviewed)
    }

    fn present(&mut self, suggestion: &CommandSuggestion) -> AppResult<()> {
        print_command(&mut self.out, &suggestion.command)?;
        print_description(&mut self.out, &suggestion.description)?;
        if let Some(explanation) = &suggestion.explanation {
            print_explanation(&mut self.out, explanation)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn confirm(&mut self, verdict: &Verdict) -> AppResult<Option<Clearance>> {
        print_warning(&mut self.out, &verdict.reason)?;
        // The prompt must not sit above unflushed text
        self.out.flush()?;

        let answer = self.prompt.ask(CONFIRM_QUESTION)?;
        debug!("Confirmation answer: {:?}", answer.trim());

        Ok(is_affirmative(&answer).then_some(Clearance::Confirmed))
    }

    fn decline(&mut self, suggestion: &CommandSuggestion, verdict: &Verdict) -> AppResult<()> {
        writeln!(self.out, "{}", STOPPED_MESSAGE)?;
        self.out.flush()?;

        self.record(|audit| audit.log_declined(&suggestion.command, &verdict.reason));
        self.transition(State::Aborted);
        Ok(())
    }

    fn execute(
        &mut self,
        suggestion: &CommandSuggestion,
        verdict: &Verdict,
        clearance: Clearance,
    ) -> AppResult<Outcome> {
        self.transition(State::Executing);
        debug!("Executing '{}' ({:?})", suggestion.command, clearance);

        let result = split_command(&suggestion.command)
            .map_err(ExecutionError::from)
            .and_then(|argv| self.runner.run(&argv));

        let outcome = match result {
            Ok(stdout) => {
                self.out.write_all(stdout.as_bytes())?;
                self.record(|audit| {
                    audit.log_command(&suggestion.command, 0, verdict.is_destructive)
                });
                Outcome::Executed {
                    command: suggestion.command.clone(),
                }
            }
            Err(e) => {
                warn!("Command failed: {}", e);
                writeln!(self.out, "Error: {}", e)?;
                let exit_code = e.exit_code();
                self.record(|audit| {
                    audit.log_command(&suggestion.command, exit_code, verdict.is_destructive)
                });
                Outcome::ExecutionFailed(e)
            }
        };
        self.out.flush()?;

        self.transition(State::Done);
        Ok(outcome)
    }

    fn record<F>(&self, write: F)
    where
        F: FnOnce(&AuditLogger) -> std::io::Result<()>,
    {
        if let Some(audit) = &self.audit {
            if let Err(e) = write(audit) {
                warn!("Failed to write command history: {}", e);
            }
        }
    }

    fn transition(&mut self, next: State) {
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
