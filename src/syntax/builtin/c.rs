//! C/C++ language definition

use crate::error::Result;
use crate::syntax::language::LanguageDefinition;
use crate::syntax::rules::{MultilineRule, PatternRule};
use crate::syntax::token::TokenType;

/// Create C language definition (also works for C++)
pub fn c_language() -> Result<LanguageDefinition> {
    let mut lang = LanguageDefinition::new("C");
    for ext in ["c", "h", "cpp", "hpp", "cc", "cxx"] {
        lang.add_extension(ext);
    }
    lang.set_line_comment("//");

    // Block comments
    lang.add_multiline(MultilineRule::new(
        "block_comment",
        r"/\*",
        r"\*/",
        TokenType::Comment,
        1,
    )?);

    // Strings (with escape support)
    lang.add_multiline(MultilineRule::with_escape(
        "string",
        r#"""#,
        r#"""#,
        TokenType::String,
        2,
        '\\',
    )?);

    lang.add_pattern(PatternRule::new("line_comment", r"//.*$", TokenType::Comment, 100)?);

    // Preprocessor directives
    lang.add_pattern(PatternRule::new(
        "preprocessor",
        r"^\s*#\s*\w+",
        TokenType::Keyword2,
        95,
    )?);

    lang.add_pattern(PatternRule::new("char", r"'(?:[^'\\]|\\.)'", TokenType::String, 90)?);

    let keywords = r"\b(auto|break|case|char|const|continue|default|do|double|else|enum|extern|float|for|goto|if|inline|int|long|register|restrict|return|short|signed|sizeof|static|struct|switch|typedef|union|unsigned|void|volatile|while)\b";
    lang.add_pattern(PatternRule::new("keyword", keywords, TokenType::Keyword, 80)?);

    let cpp_keywords = r"\b(alignas|alignof|bool|catch|class|constexpr|const_cast|decltype|delete|dynamic_cast|explicit|export|false|friend|mutable|namespace|new|noexcept|nullptr|operator|private|protected|public|reinterpret_cast|static_assert|static_cast|template|this|thread_local|throw|true|try|typeid|typename|using|virtual)\b";
    lang.add_pattern(PatternRule::new("cpp_keyword", cpp_keywords, TokenType::Keyword, 79)?);

    let types = r"\b(size_t|ptrdiff_t|intptr_t|uintptr_t|int8_t|int16_t|int32_t|int64_t|uint8_t|uint16_t|uint32_t|uint64_t|wchar_t)\b";
    lang.add_pattern(PatternRule::new("type", types, TokenType::Type, 75)?);

    let std_types = r"\b(FILE|NULL|std|string|vector|map|set|unique_ptr|shared_ptr)\b";
    lang.add_pattern(PatternRule::new("std_type", std_types, TokenType::Type2, 74)?);

    lang.add_pattern(PatternRule::new(
        "hex",
        r"\b0[xX][0-9a-fA-F]+[uUlL]*\b",
        TokenType::Number,
        65,
    )?);
    lang.add_pattern(PatternRule::new(
        "float",
        r"\b\d+\.\d*(?:[eE][+-]?\d+)?[fFlL]?",
        TokenType::Number,
        64,
    )?);
    lang.add_pattern(PatternRule::new("integer", r"\b\d+[uUlL]*\b", TokenType::Number, 63)?);

    lang.add_pattern(PatternRule::new(
        "operator",
        r"[+\-*/%&|^!<>=~?:]+",
        TokenType::Operator,
        40,
    )?);

    super::add_brackets(&mut lang)?;
    super::add_identifiers(&mut lang)?;

    Ok(lang)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::Lexer;
    use crate::syntax::token::Token;

    fn classify(text: &str) -> Vec<(TokenType, &str)> {
        let lang = c_language().unwrap();
        lang.parse(text)
            .iter()
            .map(|t: &Token| (t.token_type, t.text(text).unwrap_or("")))
            .collect()
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            classify("int x;"),
            vec![
                (TokenType::Keyword, "int"),
                (TokenType::Identifier, "x"),
                (TokenType::Operator, ";"),
            ]
        );
    }

    #[test]
    fn test_commented_out_declaration() {
        assert_eq!(classify("//int x;"), vec![(TokenType::Comment, "//int x;")]);
    }

    #[test]
    fn test_preprocessor_and_string() {
        let tokens = classify("#include \"stdio.h\"");
        assert_eq!(tokens[0], (TokenType::Keyword2, "#include"));
        assert_eq!(tokens[1], (TokenType::String, "\"stdio.h\""));
    }

    #[test]
    fn test_numbers_and_types() {
        let tokens = classify("size_t n = 0x1F + 2.5f;");
        assert_eq!(tokens[0], (TokenType::Type, "size_t"));
        assert!(tokens.contains(&(TokenType::Number, "0x1F")));
        assert!(tokens.contains(&(TokenType::Number, "2.5f")));
        assert!(tokens.contains(&(TokenType::Operator, "+")));
    }

    #[test]
    fn test_brackets_are_paired() {
        let lang = c_language().unwrap();
        let tokens = lang.parse("f(a[0]) { }");
        let pairs: Vec<i32> = tokens
            .iter()
            .filter(|t| t.is_paired())
            .map(|t| t.pair_value)
            .collect();
        assert_eq!(pairs, vec![1, 3, -3, -1, 2, -2]);
    }
}
