use std::io::{self, BufRead, Write};

/// Asks the user a question and returns the raw answer
pub trait ConfirmPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Reads the answer as one line from stdin. Blocks without a timeout.
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        // EOF reads as an empty answer, which declines
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// Only a case-insensitive "y" counts as consent
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
