//! Input tokenization.
//!
//! Splits a raw command line into whitespace-delimited tokens. Case is
//! preserved: literal matching is case-insensitive, but typed arguments
//! (names, messages) keep what the sender typed.

/// A command line split into its command word and arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    /// The command word, without a leading `/`.
    pub label: String,
    /// Every token after the command word.
    pub args: Vec<String>,
}

/// Tokenizes command input.
pub struct InputTokenizer;

impl InputTokenizer {
    /// Splits input on whitespace, dropping empty tokens.
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<String> {
        input.split_whitespace().map(str::to_string).collect()
    }

    /// Splits partially typed input.
    ///
    /// The last token is always the one being typed, so input that is empty
    /// or ends in whitespace yields a trailing empty token.
    #[must_use]
    pub fn tokenize_partial(input: &str) -> Vec<String> {
        let mut tokens = Self::tokenize(input);
        if input.is_empty() || input.ends_with(char::is_whitespace) {
            tokens.push(String::new());
        }
        tokens
    }

    /// Splits a complete line into command word and arguments.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn command_line(input: &str) -> Option<CommandLine> {
        Self::split(Self::tokenize(input))
    }

    /// Splits a partial line into command word and arguments.
    ///
    /// Returns `None` while the command word itself is still being typed.
    #[must_use]
    pub fn partial_command_line(input: &str) -> Option<CommandLine> {
        let tokens = Self::tokenize_partial(input);
        if tokens.len() < 2 {
            return None;
        }
        Self::split(tokens)
    }

    fn split(tokens: Vec<String>) -> Option<CommandLine> {
        let mut tokens = tokens.into_iter();
        let first = tokens.next()?;
        let label = first.strip_prefix('/').unwrap_or(&first).to_string();
        if label.is_empty() {
            return None;
        }
        Some(CommandLine {
            label,
            args: tokens.collect(),
        })
    }
}
