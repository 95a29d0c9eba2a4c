//! Tokens produced by a lexer
//!
//! A token is an immutable classified span of document text. Tokens
//! that belong to a bracket family carry a signed pair value: the
//! magnitude names the family, the sign says opener (+) or closer (-).

use std::ops::Range;
use std::str::FromStr;

use super::style::{Color, Style};
use crate::error::PaneError;

/// Lexical classes a token can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    /// Language operators and punctuation
    Operator,
    /// Reserved keywords
    Keyword,
    /// Secondary keywords (preprocessor directives, macros)
    Keyword2,
    /// Identifiers, variable and function names
    Identifier,
    /// Numeric literals
    Number,
    /// String and character literals
    String,
    /// Comments
    Comment,
    /// Types supported by the language
    Type,
    /// Types from standard libraries
    Type2,
    /// Any other text
    Default,
}

impl TokenType {
    /// Every token type, in declaration order
    pub const ALL: [TokenType; 10] = [
        TokenType::Operator,
        TokenType::Keyword,
        TokenType::Keyword2,
        TokenType::Identifier,
        TokenType::Number,
        TokenType::String,
        TokenType::Comment,
        TokenType::Type,
        TokenType::Type2,
        TokenType::Default,
    ];

    /// Get the built-in style for this token type
    pub fn default_style(&self) -> Style {
        match self {
            TokenType::Operator => Style::default(),
            TokenType::Keyword => Style::fg(Color::Blue),
            TokenType::Keyword2 => Style::fg(Color::Blue).with_bold().with_italic(),
            TokenType::Identifier => Style::default(),
            TokenType::Number => Style::fg(Color::Yellow).with_bold(),
            TokenType::String => Style::fg(Color::Rgb(0xcc, 0x66, 0x00)),
            TokenType::Comment => Style::fg(Color::Green).with_italic(),
            TokenType::Type => Style::default().with_italic(),
            TokenType::Type2 => Style::default().with_bold(),
            TokenType::Default => Style::default(),
        }
    }

    /// Get the configuration name for this token type
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Operator => "OPERATOR",
            TokenType::Keyword => "KEYWORD",
            TokenType::Keyword2 => "KEYWORD2",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Number => "NUMBER",
            TokenType::String => "STRING",
            TokenType::Comment => "COMMENT",
            TokenType::Type => "TYPE",
            TokenType::Type2 => "TYPE2",
            TokenType::Default => "DEFAULT",
        }
    }

    /// Parse a token type from its configuration name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        TokenType::ALL.into_iter().find(|t| t.name() == upper)
    }
}

impl FromStr for TokenType {
    type Err = PaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenType::from_name(s).ok_or_else(|| PaneError::UnknownTokenType(s.to_string()))
    }
}

/// A classified span of document text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub token_type: TokenType,
    /// Absolute byte offset of the first byte
    pub start: usize,
    /// Span length in bytes, never zero
    pub length: usize,
    /// 0 for unpaired tokens, otherwise +family for openers and -family for closers
    pub pair_value: i32,
}

impl Token {
    pub fn new(token_type: TokenType, start: usize, length: usize) -> Self {
        Self {
            token_type,
            start,
            length,
            pair_value: 0,
        }
    }

    /// Create a token belonging to a pair family
    pub fn paired(token_type: TokenType, start: usize, length: usize, pair_value: i32) -> Self {
        Self {
            token_type,
            start,
            length,
            pair_value,
        }
    }

    /// Offset one past the last byte
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Whether `pos` is inside the token; the end offset counts as inside
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end()
    }

    /// Whether the token overlaps the half-open range `[start, end)`
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && self.end() > start
    }

    pub fn is_paired(&self) -> bool {
        self.pair_value != 0
    }

    /// Slice this token's text out of the document it was lexed from
    pub fn text<'a>(&self, document: &'a str) -> Option<&'a str> {
        document.get(self.range())
    }
}
