//! Python language definition

use crate::error::Result;
use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{MultilineRule, PatternRule};
use crate::syntax::token::TokenType;

/// Create Python language definition
pub fn python_language() -> Result<LanguageDefinition> {
    let mut lang = LanguageDefinition::new("Python");
    lang.add_extension("py");
    lang.add_extension("pyw");
    lang.add_extension("pyi");
    lang.set_line_comment("#");

    // Triple-quoted strings are listed first so they win ties against plain quotes
    lang.add_multiline(MultilineRule::new(
        "triple_double",
        r#"""""#,
        r#"""""#,
        TokenType::String,
        1,
    )?);
    lang.add_multiline(MultilineRule::new(
        "triple_single",
        r"'''",
        r"'''",
        TokenType::String,
        2,
    )?);
    lang.add_multiline(MultilineRule::with_escape(
        "double_string",
        r#"""#,
        r#"""#,
        TokenType::String,
        3,
        '\\',
    )?);
    lang.add_multiline(MultilineRule::with_escape(
        "single_string",
        r"'",
        r"'",
        TokenType::String,
        4,
        '\\',
    )?);

    lang.add_pattern(PatternRule::new("comment", r"#.*$", TokenType::Comment, 100)?);

    // Decorators
    lang.add_pattern(PatternRule::new("decorator", r"@\w+", TokenType::Keyword2, 95)?);

    let keywords = r"\b(False|None|True|and|as|assert|async|await|break|class|continue|def|del|elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|or|pass|raise|return|try|while|with|yield)\b";
    lang.add_pattern(PatternRule::new("keyword", keywords, TokenType::Keyword, 80)?);

    lang.add_pattern(PatternRule::new("self", r"\b(self|cls)\b", TokenType::Keyword2, 77)?);

    let builtin_types = r"\b(bool|bytearray|bytes|complex|dict|float|frozenset|int|list|object|set|str|tuple|type)\b";
    lang.add_pattern(PatternRule::new("builtin_type", builtin_types, TokenType::Type, 75)?);

    lang.add_pattern(PatternRule::new(
        "hex",
        r"\b0[xX][0-9a-fA-F_]+\b",
        TokenType::Number,
        65,
    )?);
    lang.add_pattern(PatternRule::new(
        "float",
        r"\b\d[\d_]*\.\d[\d_]*(?:[eE][+-]?\d+)?j?\b",
        TokenType::Number,
        64,
    )?);
    lang.add_pattern(PatternRule::new("integer", r"\b\d[\d_]*j?\b", TokenType::Number, 63)?);

    lang.add_pattern(PatternRule::new(
        "operator",
        r"[+\-*/%&|^!<>=@~:]+",
        TokenType::Operator,
        40,
    )?);

    super::add_brackets(&mut lang)?;
    super::add_identifiers(&mut lang)?;

    Ok(lang)
}
