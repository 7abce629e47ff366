pub mod help;
pub mod output;
pub mod prompt;

pub use output::{OutputStream, Pager};
pub use prompt::{is_affirmative, ConfirmPrompt, TerminalPrompt};
