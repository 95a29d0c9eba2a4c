//! Rules the regex lexer is built from
//!
//! [`PatternRule`]s classify spans inside one line; [`MultilineRule`]s
//! open a construct that may carry over into following lines, which the
//! lexer tracks through [`LineState`].

use regex::Regex;

use crate::error::Result;

use super::token::TokenType;

/// Classifies every match of a regex inside a line.
///
/// When two rules match at the same offset the higher priority wins.
#[derive(Debug)]
pub struct PatternRule {
    pub name: String,
    pub pattern: Regex,
    pub token_type: TokenType,
    pub priority: i32,
    /// Pair value stamped on every match, 0 when unpaired
    pub pair_value: i32,
}

impl PatternRule {
    pub fn new(name: &str, pattern: &str, token_type: TokenType, priority: i32) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            token_type,
            priority,
            pair_value: 0,
        })
    }

    /// Create a rule for one side of a bracket pair
    pub fn pair(name: &str, pattern: &str, pair_value: i32) -> Result<Self> {
        let mut rule = Self::new(name, pattern, TokenType::Operator, 60)?;
        rule.pair_value = pair_value;
        Ok(rule)
    }

    /// `(start, end)` of the first match at or after `start`
    pub fn find_at(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        if start >= text.len() {
            return None;
        }
        self.pattern
            .find_at(text, start)
            .map(|m| (m.start(), m.end()))
    }
}

/// A delimited construct that may span lines, such as a block comment
#[derive(Debug)]
pub struct MultilineRule {
    pub name: String,
    pub start: Regex,
    pub end: Regex,
    pub token_type: TokenType,
    /// An odd run of this character before `end` hides the delimiter
    pub escape_char: Option<char>,
    /// Identifies the rule in [`LineState::Inside`]
    pub state_id: u8,
}

impl MultilineRule {
    pub fn new(
        name: &str,
        start_pattern: &str,
        end_pattern: &str,
        token_type: TokenType,
        state_id: u8,
    ) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            start: Regex::new(start_pattern)?,
            end: Regex::new(end_pattern)?,
            token_type,
            escape_char: None,
            state_id,
        })
    }

    /// Like [`MultilineRule::new`], with an escape character for the end delimiter
    pub fn with_escape(
        name: &str,
        start_pattern: &str,
        end_pattern: &str,
        token_type: TokenType,
        state_id: u8,
        escape_char: char,
    ) -> Result<Self> {
        let mut rule = Self::new(name, start_pattern, end_pattern, token_type, state_id)?;
        rule.escape_char = Some(escape_char);
        Ok(rule)
    }

    /// `(start, end)` of the opening delimiter at or after `start`
    pub fn find_start(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        if start >= text.len() {
            return None;
        }
        self.start
            .find_at(text, start)
            .map(|m| (m.start(), m.end()))
    }

    /// Offset just past the closing delimiter at or after `start`
    pub fn find_end(&self, text: &str, start: usize) -> Option<usize> {
        if start >= text.len() {
            return None;
        }

        let Some(escape) = self.escape_char else {
            return self.end.find_at(text, start).map(|m| m.end());
        };

        let mut pos = start;
        while let Some(m) = self.end.find_at(text, pos) {
            let escapes = text[start..m.start()]
                .chars()
                .rev()
                .take_while(|&c| c == escape)
                .count();
            if escapes % 2 == 0 {
                return Some(m.end());
            }
            if m.end() == pos {
                break;
            }
            pos = m.end();
        }
        None
    }
}

/// Lexer state carried from the end of one line to the start of the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineState {
    #[default]
    Normal,
    /// Inside the multiline rule with this state id
    Inside(u8),
}

impl LineState {
    pub fn is_normal(&self) -> bool {
        *self == LineState::Normal
    }
}
