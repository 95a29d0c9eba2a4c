//! The lexer capability consumed by the token index

use super::token::Token;

/// Turns document text into an ordered token stream.
///
/// Implementations must accept any input, including empty or malformed
/// text, and return tokens sorted by `start` with non-zero lengths.
/// Non-overlap is the lexer's responsibility; the index stores whatever
/// it is given.
pub trait Lexer {
    /// Tokenize the whole of `text`; token offsets are relative to its first byte
    fn parse(&self, text: &str) -> Vec<Token>;

    /// Short name used in logs
    fn name(&self) -> &str;

    /// Line comment prefix, when the language has one
    fn line_comment(&self) -> Option<&str> {
        None
    }
}

impl<F> Lexer for F
where
    F: Fn(&str) -> Vec<Token>,
{
    fn parse(&self, text: &str) -> Vec<Token> {
        self(text)
    }

    fn name(&self) -> &str {
        "fn"
    }
}
