//! Style types for text rendering
//!
//! Styles are looked up per token type through a [`StyleTable`], an
//! immutable value built from the defaults and explicit overrides and
//! handed to the renderer when it is constructed.

use std::collections::HashMap;

use crate::error::{PaneError, Result};

use super::token::TokenType;

/// Terminal colors (ANSI 16-color palette plus true color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parse a color name (`"bright-blue"`, `"green"`) or a `#rrggbb` hex triple
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(Color::Rgb(r, g, b));
                }
            }
            return Err(PaneError::InvalidColor(name.to_string()));
        }

        let normalized = name.to_ascii_lowercase().replace(['-', '_', ' '], "");
        let color = match normalized.as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "brightblack" | "gray" | "grey" => Color::BrightBlack,
            "brightred" => Color::BrightRed,
            "brightgreen" => Color::BrightGreen,
            "brightyellow" => Color::BrightYellow,
            "brightblue" => Color::BrightBlue,
            "brightmagenta" => Color::BrightMagenta,
            "brightcyan" => Color::BrightCyan,
            "brightwhite" => Color::BrightWhite,
            _ => return Err(PaneError::InvalidColor(name.to_string())),
        };
        Ok(color)
    }
}

/// Colors and attributes for one class of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Swap foreground and background
    pub reverse: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// True when the style changes nothing
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Styled byte range `[start, end)` of document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

impl Span {
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Per-token-type style lookup
///
/// Starts from [`TokenType::default_style`] for every class; overrides
/// produce a new table and leave this table untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    styles: HashMap<TokenType, Style>,
}

impl StyleTable {
    /// Get the style for a token type
    pub fn style(&self, token_type: TokenType) -> Style {
        self.styles
            .get(&token_type)
            .copied()
            .unwrap_or_else(|| token_type.default_style())
    }

    /// Style for text no token covers
    pub fn default_style(&self) -> Style {
        self.style(TokenType::Default)
    }

    /// Return a copy of this table with one class restyled
    pub fn with_override(&self, token_type: TokenType, style: Style) -> Self {
        let mut styles = self.styles.clone();
        styles.insert(token_type, style);
        Self { styles }
    }

    /// Return a copy of this table with every entry of `overrides` applied on top
    pub fn merged<I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (TokenType, Style)>,
    {
        let mut styles = self.styles.clone();
        styles.extend(overrides);
        Self { styles }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        let styles = TokenType::ALL
            .into_iter()
            .map(|t| (t, t.default_style()))
            .collect();
        Self { styles }
    }
}
