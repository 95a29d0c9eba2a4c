//! Rust language definition

use crate::error::Result;
use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{MultilineRule, PatternRule};
use crate::syntax::token::TokenType;

/// Create Rust language definition
pub fn rust_language() -> Result<LanguageDefinition> {
    let mut lang = LanguageDefinition::new("Rust");
    lang.add_extension("rs");
    lang.set_line_comment("//");

    // Block comments (nesting is not tracked)
    lang.add_multiline(MultilineRule::new(
        "block_comment",
        r"/\*",
        r"\*/",
        TokenType::Comment,
        1,
    )?);

    // Raw strings r#"..."# (single hash only)
    lang.add_multiline(MultilineRule::new(
        "raw_string",
        r##"r#""##,
        r##""#"##,
        TokenType::String,
        2,
    )?);

    lang.add_multiline(MultilineRule::with_escape(
        "string",
        "\"",
        "\"",
        TokenType::String,
        3,
        '\\',
    )?);

    lang.add_pattern(PatternRule::new("line_comment", r"//.*$", TokenType::Comment, 100)?);

    // Attributes
    lang.add_pattern(PatternRule::new(
        "attribute",
        r"#!?\[[\w:(),=\s]*\]",
        TokenType::Keyword2,
        95,
    )?);

    lang.add_pattern(PatternRule::new("char", r"'(?:[^'\\]|\\.)'", TokenType::String, 90)?);

    // Lifetimes come after chars so 'a' stays a char literal
    lang.add_pattern(PatternRule::new("lifetime", r"'\w+", TokenType::Type2, 89)?);

    // Macros (ending with !)
    lang.add_pattern(PatternRule::new("macro", r"\b\w+!", TokenType::Keyword2, 85)?);

    let keywords = r"\b(as|async|await|break|const|continue|crate|dyn|else|enum|extern|false|fn|for|if|impl|in|let|loop|match|mod|move|mut|pub|ref|return|self|Self|static|struct|super|trait|true|type|union|unsafe|use|where|while)\b";
    lang.add_pattern(PatternRule::new("keyword", keywords, TokenType::Keyword, 80)?);

    let types = r"\b(bool|char|str|u8|u16|u32|u64|u128|usize|i8|i16|i32|i64|i128|isize|f32|f64)\b";
    lang.add_pattern(PatternRule::new("type", types, TokenType::Type, 75)?);

    let std_types = r"\b(String|Vec|Box|Rc|Arc|Option|Result|Some|None|Ok|Err|HashMap)\b";
    lang.add_pattern(PatternRule::new("std_type", std_types, TokenType::Type2, 74)?);

    // Other capitalized identifiers are type names
    lang.add_pattern(PatternRule::new(
        "type_name",
        r"\b[A-Z][a-zA-Z0-9_]*\b",
        TokenType::Type,
        61,
    )?);

    lang.add_pattern(PatternRule::new("hex", r"\b0x[0-9a-fA-F_]+\b", TokenType::Number, 65)?);
    lang.add_pattern(PatternRule::new("binary", r"\b0b[01_]+\b", TokenType::Number, 65)?);
    lang.add_pattern(PatternRule::new("octal", r"\b0o[0-7_]+\b", TokenType::Number, 65)?);
    lang.add_pattern(PatternRule::new(
        "float",
        r"\b\d[\d_]*\.\d[\d_]*(?:[eE][+-]?\d+)?(?:f32|f64)?\b",
        TokenType::Number,
        64,
    )?);
    lang.add_pattern(PatternRule::new(
        "integer",
        r"\b\d[\d_]*(?:u8|u16|u32|u64|u128|usize|i8|i16|i32|i64|i128|isize)?\b",
        TokenType::Number,
        63,
    )?);

    lang.add_pattern(PatternRule::new(
        "operator",
        r"[+\-*/%&|^!<>=@?:]+",
        TokenType::Operator,
        40,
    )?);

    super::add_brackets(&mut lang)?;
    super::add_identifiers(&mut lang)?;

    Ok(lang)
}
