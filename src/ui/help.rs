use std::io::{self, Write};

/// Extended usage documentation shown by `agit --explain` without a request
pub const EXPLAIN_TEXT: &str = "\
agit translates plain-English requests into git commands and runs them.

USAGE
  agit <request>...            Translate the request and run the command
  agit --explain <request>...  Also print a detailed explanation first
  agit --review [focus]...     Review un-staged changes (git diff)
  agit --debug ...             Log the prompt and the raw model response

HOW IT WORKS
  1. Your request is sent to the configured language model, which answers
     with a git command and a short description.
  2. The command and description are printed before anything runs.
  3. Commands that can lose work or rewrite history (force push, hard reset,
     clean -f, branch deletion, rebase, filter-branch, ...) are held back
     until you answer 'y' at the confirmation prompt.
  4. Everything else runs immediately and its output is shown.

EXAMPLES
  agit show me changes not yet committed
  agit --explain undo the last commit but keep my changes
  agit delete the feature branch
  agit --review check error handling and naming

CONFIGURATION
  The API key is read from OPENAI_API_KEY (ANTHROPIC_API_KEY when the
  provider is anthropic). Optional settings live in
  ~/.config/agit/config.toml, or the file named by AGIT_CONFIG:

    [llm]
    provider = \"openai\"        # or \"anthropic\"
    model = \"gpt-4o-mini\"
    timeout_seconds = 30

    [behavior]
    pager = true               # page long output; NOPAGER=1 disables
    log_commands = true        # history in ~/.config/agit/history.log
";

pub fn explain<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(EXPLAIN_TEXT.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_mentions_every_flag() {
        let mut out = Vec::new();
        explain(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        for flag in ["--explain", "--review", "--debug"] {
            assert!(text.contains(flag), "missing {}", flag);
        }
        assert!(text.contains("OPENAI_API_KEY"));
    }
}
