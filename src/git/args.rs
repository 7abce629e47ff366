use thiserror::Error;

/// Errors that can occur while splitting a command line into arguments
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Unterminated {0} quote")]
    UnterminatedQuote(char),

    #[error("Trailing escape character")]
    TrailingEscape,
}

/// Split a command line into argument tokens.
///
/// Whitespace separates words. Single quotes group text literally, double
/// quotes group text and honour `\"`, `\\`, `\$` and `` \` `` escapes, and a
/// backslash outside quotes escapes the next character. No expansion of any
/// kind is performed.
pub fn split_command(input: &str) -> Result<Vec<String>, SplitError> {
    split(input, true)
}

/// Like [`split_command`] but never fails: an unterminated quote runs to the
/// end of the input and a trailing backslash is dropped.
pub fn split_lenient(input: &str) -> Vec<String> {
    split(input, false).unwrap_or_default()
}

fn split(input: &str, strict: bool) -> Result<Vec<String>, SplitError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(next @ ('"' | '\\' | '$' | '`')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => match chars.next() {
                Some(next) => {
                    current.push(next);
                    in_word = true;
                }
                None if strict => return Err(SplitError::TrailingEscape),
                None => {}
            },
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        if strict {
            return Err(SplitError::UnterminatedQuote(q));
        }
    }

    if in_word {
        words.push(current);
    }

    Ok(words)
}
