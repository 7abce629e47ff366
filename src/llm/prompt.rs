//! Instruction templates sent to the language model.

const TRANSLATION_TEMPLATE: &str = "You are a git command expert. Translate the user's request into a single git command.

User request: {query}

CRITICAL INSTRUCTIONS:
- Respond with ONLY a JSON object, no markdown and no commentary
- The JSON object must have exactly these keys: {keys}
- \"command\": one line containing the complete git command, starting with \"git \"
- \"description\": one short sentence describing what the command does
{explanation_rule}- Quote arguments containing spaces with single quotes
- Example response: {example}

Your response:";

const EXPLANATION_RULE: &str = "- \"explanation\": a detailed explanation of the command, its flags and a usage example\n";

const REVIEW_PREAMBLE: &str = "You are an experienced software engineer reviewing a patch.
Review the following un-staged changes against the latest revision.
Comment on correctness, readability, naming, error handling and potential bugs.
Point to specific lines where possible and suggest concrete improvements.";

/// Build the translation prompt; `want_explanation` adds the explanation key
pub fn translation_prompt(query: &str, want_explanation: bool) -> String {
    let (keys, rule, example) = if want_explanation {
        (
            "\"command\", \"description\", \"explanation\"",
            EXPLANATION_RULE,
            r#"{"command": "git status", "description": "Show the working tree status", "explanation": "git status lists staged, unstaged and untracked files."}"#,
        )
    } else {
        (
            "\"command\", \"description\"",
            "",
            r#"{"command": "git status", "description": "Show the working tree status"}"#,
        )
    };

    TRANSLATION_TEMPLATE
        .replace("{keys}", keys)
        .replace("{explanation_rule}", rule)
        .replace("{example}", example)
        .replace("{query}", query)
}

/// Build the review prompt; each instruction becomes a focus bullet
pub fn review_prompt(diff: &str, instructions: &[String]) -> String {
    let focus = if instructions.is_empty() {
        String::new()
    } else {
        let bullets: Vec<String> = instructions
            .iter()
            .map(|instruction| format!("- {}", instruction))
            .collect();
        format!("\nPay particular attention to:\n{}\n", bullets.join("\n"))
    };

    // Neither the focus nor the diff is scanned for placeholders
    format!(
        "{}\n{}\nPatch:\n{}\n\nYour review:",
        REVIEW_PREAMBLE, focus, diff
    )
}
