//! Built-in language definitions
//!
//! This module provides lexers for common programming languages.

mod c;
mod python;
mod rust;

pub use c::c_language;
pub use python::python_language;
pub use rust::rust_language;

use crate::error::Result;

use super::language::LanguageDefinition;
use super::rules::PatternRule;
use super::token::TokenType;

/// Pair family of `(` / `)`
pub const PAREN: i32 = 1;
/// Pair family of `{` / `}`
pub const BRACE: i32 = 2;
/// Pair family of `[` / `]`
pub const BRACKET: i32 = 3;

/// Add the three bracket families shared by every built-in language
fn add_brackets(lang: &mut LanguageDefinition) -> Result<()> {
    lang.add_pattern(PatternRule::pair("paren_open", r"\(", PAREN)?);
    lang.add_pattern(PatternRule::pair("paren_close", r"\)", -PAREN)?);
    lang.add_pattern(PatternRule::pair("brace_open", r"\{", BRACE)?);
    lang.add_pattern(PatternRule::pair("brace_close", r"\}", -BRACE)?);
    lang.add_pattern(PatternRule::pair("bracket_open", r"\[", BRACKET)?);
    lang.add_pattern(PatternRule::pair("bracket_close", r"\]", -BRACKET)?);
    Ok(())
}

/// Add identifiers and plain punctuation, the lowest priority rules
fn add_identifiers(lang: &mut LanguageDefinition) -> Result<()> {
    lang.add_pattern(PatternRule::new(
        "identifier",
        r"\b[A-Za-z_][A-Za-z0-9_]*\b",
        TokenType::Identifier,
        10,
    )?);
    lang.add_pattern(PatternRule::new("punctuation", r"[;,.]", TokenType::Operator, 5)?);
    Ok(())
}
