//! Language definitions for the regex lexer
//!
//! This module provides the LanguageDefinition struct that combines
//! pattern rules, multiline rules and pair rules for a programming
//! language and turns a whole document into tokens.

use super::lexer::Lexer;
use super::rules::{LineState, MultilineRule, PatternRule};
use super::token::{Token, TokenType};

/// A complete language definition for tokenization
#[derive(Debug)]
pub struct LanguageDefinition {
    /// Language name (e.g., "Rust", "Python")
    pub name: String,
    /// File extensions (e.g., ["rs"], ["py", "pyw"])
    pub extensions: Vec<String>,
    /// Single-line pattern rules, sorted by priority (highest first)
    pub patterns: Vec<PatternRule>,
    /// Multi-line rules for comments, strings, etc.
    pub multiline_rules: Vec<MultilineRule>,
    /// Prefix used by the toggle-comments action
    pub line_comment: Option<String>,
}

/// What the earliest match at or after the scan position came from
enum Candidate<'a> {
    Multiline(&'a MultilineRule),
    Pattern(&'a PatternRule),
}

/// A rule's next match on the current line
#[derive(Debug, Clone, Copy)]
enum NextMatch {
    Unknown,
    At(usize, usize),
    /// Nothing at or after the last search; stays true for the rest of the line
    Exhausted,
}

impl NextMatch {
    /// The cached match, searching again only when it starts before `pos`
    fn refresh(
        &mut self,
        pos: usize,
        find: impl FnOnce() -> Option<(usize, usize)>,
    ) -> Option<(usize, usize)> {
        let stale = match *self {
            NextMatch::Unknown => true,
            NextMatch::At(start, _) => start < pos,
            NextMatch::Exhausted => false,
        };
        if stale {
            *self = find().map_or(NextMatch::Exhausted, |(s, e)| NextMatch::At(s, e));
        }
        match *self {
            NextMatch::At(start, end) => Some((start, end)),
            _ => None,
        }
    }
}

/// Next-match cache for every rule of a language, valid for one line
struct LineMatches {
    multiline: Vec<NextMatch>,
    patterns: Vec<NextMatch>,
}

impl LineMatches {
    fn new(lang: &LanguageDefinition) -> Self {
        Self {
            multiline: vec![NextMatch::Unknown; lang.multiline_rules.len()],
            patterns: vec![NextMatch::Unknown; lang.patterns.len()],
        }
    }
}

impl LanguageDefinition {
    /// Create a new empty language definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            patterns: Vec::new(),
            multiline_rules: Vec::new(),
            line_comment: None,
        }
    }

    /// Add a file extension
    pub fn add_extension(&mut self, ext: &str) {
        self.extensions.push(ext.to_string());
    }

    /// Add a pattern rule
    pub fn add_pattern(&mut self, rule: PatternRule) {
        self.patterns.push(rule);
        // Stable sort keeps insertion order among equal priorities
        self.patterns.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Add a multiline rule
    pub fn add_multiline(&mut self, rule: MultilineRule) {
        self.multiline_rules.push(rule);
    }

    /// Set the line comment prefix
    pub fn set_line_comment(&mut self, prefix: &str) {
        self.line_comment = Some(prefix.to_string());
    }

    fn get_multiline_rule(&self, state_id: u8) -> Option<&MultilineRule> {
        self.multiline_rules.iter().find(|r| r.state_id == state_id)
    }

    /// Find the earliest rule match at or after `pos`.
    ///
    /// Ties go to multiline rules first, then to higher priority patterns.
    /// A rule is searched again only once the scan has moved past its
    /// cached match, so each line costs one pass per rule.
    fn earliest_match(
        &self,
        text: &str,
        pos: usize,
        cache: &mut LineMatches,
    ) -> Option<(usize, usize, Candidate<'_>)> {
        let mut best: Option<(usize, usize, Candidate<'_>)> = None;

        for (rule, next) in self.multiline_rules.iter().zip(&mut cache.multiline) {
            if let Some((start, end)) = next.refresh(pos, || rule.find_start(text, pos)) {
                if end > start && best.as_ref().map_or(true, |(s, _, _)| start < *s) {
                    best = Some((start, end, Candidate::Multiline(rule)));
                }
            }
        }

        for (rule, next) in self.patterns.iter().zip(&mut cache.patterns) {
            if let Some((start, end)) = next.refresh(pos, || rule.find_at(text, pos)) {
                if end > start && best.as_ref().map_or(true, |(s, _, _)| start < *s) {
                    best = Some((start, end, Candidate::Pattern(rule)));
                }
            }
        }

        best
    }

    /// Tokenize a single line of text
    ///
    /// Takes the line text, its absolute offset and the state from the
    /// previous line. Pushes tokens to `out` and returns the state for
    /// the next line.
    pub fn tokenize_line(
        &self,
        text: &str,
        base: usize,
        prev_state: LineState,
        out: &mut Vec<Token>,
    ) -> LineState {
        let mut pos = 0;
        let mut state = prev_state;
        let mut cache = LineMatches::new(self);
        let mut push = |start: usize, end: usize, token_type: TokenType, pair_value: i32| {
            if end > start {
                out.push(Token::paired(token_type, base + start, end - start, pair_value));
            }
        };

        while pos < text.len() {
            if let LineState::Inside(id) = state {
                let Some(rule) = self.get_multiline_rule(id) else {
                    state = LineState::Normal;
                    continue;
                };
                match rule.find_end(text, pos) {
                    Some(end) => {
                        push(pos, end, rule.token_type, 0);
                        pos = end;
                        state = LineState::Normal;
                    }
                    None => {
                        push(pos, text.len(), rule.token_type, 0);
                        return state;
                    }
                }
                continue;
            }

            let Some((start, end, candidate)) = self.earliest_match(text, pos, &mut cache) else {
                break;
            };

            match candidate {
                Candidate::Multiline(rule) => match rule.find_end(text, end) {
                    Some(close) => {
                        push(start, close, rule.token_type, 0);
                        pos = close;
                    }
                    None => {
                        push(start, text.len(), rule.token_type, 0);
                        return LineState::Inside(rule.state_id);
                    }
                },
                Candidate::Pattern(rule) => {
                    push(start, end, rule.token_type, rule.pair_value);
                    pos = end;
                }
            }
        }

        state
    }
}

impl Lexer for LanguageDefinition {
    fn parse(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(text.len() / 4);
        let mut state = LineState::Normal;
        let mut base = 0;
        for line in text.split('\n') {
            state = self.tokenize_line(line, base, state, &mut tokens);
            base += line.len() + 1;
        }
        tokens
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn line_comment(&self) -> Option<&str> {
        self.line_comment.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn create_test_language() -> LanguageDefinition {
        let mut lang = LanguageDefinition::new("Test");
        lang.add_extension("test");
        lang.set_line_comment("//");

        lang.add_pattern(
            PatternRule::new("line_comment", r"//.*$", TokenType::Comment, 100).unwrap(),
        );
        lang.add_pattern(PatternRule::new("number", r"\b\d+\b", TokenType::Number, 50).unwrap());
        lang.add_pattern(
            PatternRule::new("keyword", r"\b(let|int)\b", TokenType::Keyword, 80).unwrap(),
        );
        lang.add_pattern(
            PatternRule::new("ident", r"\b[A-Za-z_]\w*\b", TokenType::Identifier, 10).unwrap(),
        );
        lang.add_pattern(PatternRule::pair("open", r"\(", 1).unwrap());
        lang.add_pattern(PatternRule::pair("close", r"\)", -1).unwrap());
        lang.add_multiline(
            MultilineRule::new("block_comment", r"/\*", r"\*/", TokenType::Comment, 1).unwrap(),
        );

        lang
    }

    fn types(tokens: &[Token]) -> Vec<TokenType> {
        tokens.iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn test_simple_line() {
        let lang = create_test_language();
        let mut tokens = Vec::new();
        let state = lang.tokenize_line("let x = 42;", 0, LineState::default(), &mut tokens);

        assert!(state.is_normal());
        assert_eq!(
            types(&tokens),
            vec![TokenType::Keyword, TokenType::Identifier, TokenType::Number]
        );
        assert_eq!((tokens[2].start, tokens[2].end()), (8, 10));
    }

    #[test]
    fn test_line_comment() {
        let lang = create_test_language();
        let tokens = lang.parse("code // comment");
        assert_eq!(tokens.last().map(|t| (t.start, t.token_type)), Some((5, TokenType::Comment)));
        assert_eq!(tokens.last().map(|t| t.end()), Some(15));
    }

    #[test]
    fn test_block_comment_hides_identifiers() {
        let lang = create_test_language();
        let tokens = lang.parse("a /* b */ 1");
        assert_eq!(
            types(&tokens),
            vec![TokenType::Identifier, TokenType::Comment, TokenType::Number]
        );
        assert_eq!((tokens[1].start, tokens[1].end()), (2, 9));
    }

    #[test]
    fn test_multiline_across_lines() {
        let lang = create_test_language();
        let text = "x /* one\ntwo\nthree */ 7";
        let tokens = lang.parse(text);

        let comments: Vec<&str> = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::Comment)
            .filter_map(|t| t.text(text))
            .collect();
        assert_eq!(comments, vec!["/* one", "two", "three */"]);
        assert_eq!(tokens.last().and_then(|t| t.text(text)), Some("7"));
    }

    #[test]
    fn test_multiline_state_carried() {
        let lang = create_test_language();
        let mut tokens = Vec::new();
        let state = lang.tokenize_line("code /* comment", 0, LineState::default(), &mut tokens);
        assert_eq!(state, LineState::Inside(1));

        let state = lang.tokenize_line("still in comment", 16, state, &mut tokens);
        assert_eq!(state, LineState::Inside(1));

        let state = lang.tokenize_line("end */ code", 33, state, &mut tokens);
        assert!(state.is_normal());
    }

    #[test]
    fn test_pairs_and_offsets() {
        let lang = create_test_language();
        let tokens = lang.parse("f(x)\n(1)");
        let pairs: Vec<(usize, i32)> = tokens
            .iter()
            .filter(|t| t.is_paired())
            .map(|t| (t.start, t.pair_value))
            .collect();
        assert_eq!(pairs, vec![(1, 1), (3, -1), (5, 1), (7, -1)]);
    }

    #[test]
    fn test_tokens_sorted_and_non_overlapping() {
        let lang = create_test_language();
        let tokens = lang.parse("let a = (1 /* x */ 2) // done\n\n/*\n*/ int");
        for pair in tokens.windows(2) {
            assert!(pair[0].start < pair[1].start);
            assert!(pair[0].end() <= pair[1].start);
        }
        assert!(tokens.iter().all(|t| t.length > 0));
    }

    #[test]
    fn test_empty_and_malformed_input() {
        let lang = create_test_language();
        assert!(lang.parse("").is_empty());
        assert!(lang.parse("\n\n").is_empty());
        // Unterminated block comment just runs to the end
        let tokens = lang.parse("/* never closed");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::Comment);
    }

    #[test]
    fn test_long_line_matches_split_lines() {
        let lang = create_test_language();
        let one_line: String = (0..50).map(|i| format!("a{}=b;", i % 10)).collect();
        let split: String = (0..50).map(|i| format!("a{}=b;\n", i % 10)).collect();

        let long = lang.parse(&one_line);
        let short = lang.parse(&split);
        assert_eq!(long.len(), short.len());
        for (l, s) in long.iter().zip(&short) {
            assert_eq!(l.token_type, s.token_type);
            // Each statement is 5 bytes, 6 with its newline
            assert_eq!(l.start / 5, s.start / 6);
            assert_eq!(l.start % 5, s.start % 6);
            assert_eq!(l.length, s.length);
        }
    }

    #[test]
    fn test_long_line_parse_time() {
        let lang = create_test_language();
        let n = 20_000;
        let one_line: String = (0..n).map(|i| format!("a{}=b;", i % 10)).collect();
        let split: String = (0..n).map(|i| format!("a{}=b;\n", i % 10)).collect();

        let started = Instant::now();
        let short = lang.parse(&split);
        let split_time = started.elapsed();

        let started = Instant::now();
        let long = lang.parse(&one_line);
        let line_time = started.elapsed();

        assert_eq!(long.len(), short.len());
        assert!(
            line_time <= split_time * 10 + Duration::from_millis(200),
            "one line took {:?}, split lines took {:?}",
            line_time,
            split_time
        );
    }

    #[test]
    fn test_unicode_offsets() {
        let lang = create_test_language();
        let text = "é (1)";
        let tokens = lang.parse(text);
        assert_eq!(tokens[0].text(text), Some("("));
        assert_eq!(tokens[0].start, 3);
    }
}
