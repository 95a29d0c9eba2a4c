//! Syntax module
//!
//! This module provides the lexical layer of the editor:
//! - Token types and tokens
//! - The lexer contract and a regex rule lexer
//! - Built-in languages and their registry
//! - Styles for each token type

mod builtin;
mod language;
mod lexer;
mod registry;
mod rules;
mod style;
mod token;

pub use builtin::{c_language, python_language, rust_language, BRACE, BRACKET, PAREN};
pub use language::LanguageDefinition;
pub use lexer::Lexer;
pub use registry::{LanguageFactory, LanguageRegistry, BUILTIN_LANGUAGES};
pub use rules::{LineState, MultilineRule, PatternRule};
pub use style::{Color, Span, Style, StyleTable};
pub use token::{Token, TokenType};
