//! Token index
//!
//! The sorted token list of one document, rebuilt wholesale from the
//! lexer after every change. All position queries go through
//! [`TokenIndex::anchor`], the single binary search shared by
//! `token_at`, `tokens` and the pair matcher.
//!
//! An index can be *absent* (no lexer attached) or *empty* (the lexer
//! found nothing). Queries answer `None` or nothing in both cases.

use std::iter::FusedIterator;
use std::time::Instant;

use tracing::trace;

use crate::syntax::{Lexer, Token};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenIndex {
    tokens: Option<Vec<Token>>,
}

impl TokenIndex {
    /// An index with no token list at all
    pub fn absent() -> Self {
        Self { tokens: None }
    }

    /// An index over tokens already sorted by start offset
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens: Some(tokens),
        }
    }

    /// Replace the token list with a fresh parse of `text`
    pub fn rebuild(&mut self, lexer: Option<&dyn Lexer>, text: &str) {
        let Some(lexer) = lexer else {
            self.tokens = None;
            return;
        };
        let started = Instant::now();
        let tokens = lexer.parse(text);
        trace!(
            lexer = lexer.name(),
            len = text.len(),
            tokens = tokens.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "parsed document"
        );
        self.tokens = Some(tokens);
    }

    pub fn is_absent(&self) -> bool {
        self.tokens.is_none()
    }

    /// The token list, if present
    pub fn as_slice(&self) -> Option<&[Token]> {
        self.tokens.as_deref()
    }

    fn slice(&self) -> &[Token] {
        self.tokens.as_deref().unwrap_or(&[])
    }

    /// Number of tokens (0 when absent)
    pub fn len(&self) -> usize {
        self.slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slice().is_empty()
    }

    pub fn get(&self, ndx: usize) -> Option<&Token> {
        self.slice().get(ndx)
    }

    /// Locate the anchor slot for `pos`.
    ///
    /// Returns the first token starting exactly at `pos`, or else the
    /// last token starting before it. When every token starts after
    /// `pos` the first slot is returned; callers must still check
    /// containment. `None` only when there are no tokens.
    pub fn anchor(&self, pos: usize) -> Option<usize> {
        let tokens = self.slice();
        if tokens.is_empty() {
            return None;
        }
        let ndx = tokens.partition_point(|t| t.start < pos);
        if ndx < tokens.len() && tokens[ndx].start == pos {
            Some(ndx)
        } else {
            Some(ndx.saturating_sub(1))
        }
    }

    /// Token whose span contains `pos`, counting the end offset as inside.
    ///
    /// Where one token ends exactly at the start of the next, the later
    /// token is reported.
    pub fn token_at(&self, pos: usize) -> Option<&Token> {
        let ndx = self.anchor(pos)?;
        self.slice().get(ndx).filter(|t| t.contains(pos))
    }

    /// Tokens overlapping `[start, end)`, in ascending order
    pub fn tokens(&self, start: usize, end: usize) -> TokenRange<'_> {
        let tokens = self.slice();
        let ndx = match self.anchor(start) {
            Some(ndx) if tokens[ndx].end() <= start => ndx + 1,
            Some(ndx) => ndx,
            None => 0,
        };
        TokenRange { tokens, ndx, end }
    }

    /// Slot holding `token`
    pub fn index_of(&self, token: &Token) -> Option<usize> {
        let tokens = self.slice();
        let ndx = self.anchor(token.start)?;
        if tokens[ndx] == *token {
            return Some(ndx);
        }
        // Lexers may emit tokens sharing a start offset
        tokens.iter().position(|t| t == token)
    }
}

/// One-shot forward iterator over the tokens overlapping a range.
///
/// Yields shared references only; the index cannot be changed through it.
#[derive(Debug, Clone)]
pub struct TokenRange<'a> {
    tokens: &'a [Token],
    ndx: usize,
    end: usize,
}

impl<'a> Iterator for TokenRange<'a> {
    type Item = &'a Token;

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.ndx).filter(|t| t.start < self.end)?;
        self.ndx += 1;
        Some(token)
    }
}

impl FusedIterator for TokenRange<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TokenType;

    /// `int x;` lexed as keyword, identifier, operator
    fn sample() -> TokenIndex {
        TokenIndex::from_tokens(vec![
            Token::new(TokenType::Keyword, 0, 3),
            Token::new(TokenType::Identifier, 4, 1),
            Token::new(TokenType::Operator, 5, 1),
        ])
    }

    fn starts<'a>(it: impl Iterator<Item = &'a Token>) -> Vec<usize> {
        it.map(|t| t.start).collect()
    }

    #[test]
    fn test_absent_and_empty() {
        let absent = TokenIndex::absent();
        assert!(absent.is_absent());
        assert_eq!(absent.token_at(0), None);
        assert_eq!(absent.tokens(0, 10).count(), 0);
        assert_eq!(absent.anchor(0), None);

        let empty = TokenIndex::from_tokens(Vec::new());
        assert!(!empty.is_absent());
        assert_eq!(empty.token_at(0), None);
        assert_eq!(empty.tokens(0, 10).count(), 0);
    }

    #[test]
    fn test_rebuild_without_lexer_is_absent() {
        let mut index = sample();
        index.rebuild(None, "int x;");
        assert!(index.is_absent());
    }

    #[test]
    fn test_rebuild_with_lexer() {
        let lexer = |text: &str| -> Vec<Token> {
            text.match_indices('x')
                .map(|(i, _)| Token::new(TokenType::Identifier, i, 1))
                .collect()
        };
        let mut index = TokenIndex::absent();
        index.rebuild(Some(&lexer), "x-x");
        assert_eq!(index.len(), 2);

        index.rebuild(Some(&lexer), "");
        assert!(!index.is_absent());
        assert!(index.is_empty());
    }

    #[test]
    fn test_anchor() {
        let index = sample();
        assert_eq!(index.anchor(0), Some(0));
        assert_eq!(index.anchor(2), Some(0));
        assert_eq!(index.anchor(4), Some(1));
        assert_eq!(index.anchor(5), Some(2));
        assert_eq!(index.anchor(50), Some(2));

        let late = TokenIndex::from_tokens(vec![Token::new(TokenType::Number, 3, 2)]);
        assert_eq!(late.anchor(0), Some(0));
    }

    #[test]
    fn test_token_at() {
        let index = sample();
        assert_eq!(index.token_at(0).map(|t| t.start), Some(0));
        assert_eq!(index.token_at(2).map(|t| t.start), Some(0));
        // End of `int` is still `int`
        assert_eq!(index.token_at(3).map(|t| t.start), Some(0));
        // Shared boundary between `x` and `;` goes to the later token
        assert_eq!(index.token_at(5).map(|t| t.start), Some(5));
        assert_eq!(index.token_at(6).map(|t| t.start), Some(5));
        assert_eq!(index.token_at(7), None);
    }

    #[test]
    fn test_token_at_before_first_token() {
        let index = TokenIndex::from_tokens(vec![Token::new(TokenType::Number, 3, 2)]);
        assert_eq!(index.token_at(0), None);
        assert_eq!(index.token_at(2), None);
        assert!(index.token_at(3).is_some());
    }

    #[test]
    fn test_tokens_range() {
        let index = sample();
        assert_eq!(starts(index.tokens(0, 6)), vec![0, 4, 5]);
        assert_eq!(starts(index.tokens(1, 2)), vec![0]);
        // `int` ends at 3 so it does not overlap [3, 5)
        assert_eq!(starts(index.tokens(3, 5)), vec![4]);
        assert_eq!(starts(index.tokens(4, 5)), vec![4]);
        assert_eq!(starts(index.tokens(5, 100)), vec![5]);
        assert_eq!(starts(index.tokens(6, 100)), Vec::<usize>::new());
        assert_eq!(starts(index.tokens(100, 200)), Vec::<usize>::new());
    }

    #[test]
    fn test_tokens_range_is_fused() {
        let index = sample();
        let mut range = index.tokens(0, 4);
        assert!(range.next().is_some());
        assert!(range.next().is_none());
        assert!(range.next().is_none());
    }

    #[test]
    fn test_index_of() {
        let index = sample();
        let semi = Token::new(TokenType::Operator, 5, 1);
        assert_eq!(index.index_of(&semi), Some(2));
        let stranger = Token::new(TokenType::Operator, 5, 2);
        assert_eq!(index.index_of(&stranger), None);
    }
}
