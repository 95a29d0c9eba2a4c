//! Rendering of highlighted text
//!
//! [`segments`] turns a byte range of a document into styled spans;
//! [`Painter`] writes whole documents to a terminal through crossterm,
//! with an optional line-number gutter and pair marks.

use std::io::Write;
use std::ops::Range;

use crossterm::queue;
use unicode_width::UnicodeWidthChar;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};

use crate::components::Decoration;
use crate::document::SyntaxDocument;
use crate::error::Result;
use crate::syntax::{Color, Span, Style, StyleTable};

/// Split `[p0, p1)` into styled spans.
///
/// Text no token covers gets the table's default style. Tokens that
/// cross either end of the range are clipped to it.
pub fn segments(doc: &SyntaxDocument, styles: &StyleTable, p0: usize, p1: usize) -> Vec<Span> {
    let p1 = p1.min(doc.len());
    let mut spans = Vec::new();
    if p0 >= p1 {
        return spans;
    }

    let mut pos = p0;
    for token in doc.tokens(p0, p1) {
        if token.end() <= pos {
            continue;
        }
        let start = token.start.max(pos);
        if start > pos {
            spans.push(Span::new(pos, start, styles.default_style()));
        }
        let end = token.end().min(p1);
        spans.push(Span::new(start, end, styles.style(token.token_type)));
        pos = end;
    }
    if pos < p1 {
        spans.push(Span::new(pos, p1, styles.default_style()));
    }
    spans
}

/// Map a style color to the terminal palette; `None` means the terminal default
fn term_color(color: Color) -> Option<TermColor> {
    let c = match color {
        Color::Default => return None,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::White => TermColor::Grey,
        Color::BrightBlack => TermColor::DarkGrey,
        Color::BrightRed => TermColor::Red,
        Color::BrightGreen => TermColor::Green,
        Color::BrightYellow => TermColor::Yellow,
        Color::BrightBlue => TermColor::Blue,
        Color::BrightMagenta => TermColor::Magenta,
        Color::BrightCyan => TermColor::Cyan,
        Color::BrightWhite => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
    };
    Some(c)
}

/// Cut `range` at mark boundaries, flagging the pieces inside a mark
fn mark_pieces(range: Range<usize>, marks: &[Range<usize>]) -> Vec<(Range<usize>, bool)> {
    let mut cuts = vec![range.start, range.end];
    for m in marks {
        for p in [m.start, m.end] {
            if p > range.start && p < range.end {
                cuts.push(p);
            }
        }
    }
    cuts.sort_unstable();
    cuts.dedup();
    cuts.windows(2)
        .map(|w| {
            let marked = marks.iter().any(|m| m.start <= w[0] && w[0] < m.end);
            (w[0]..w[1], marked)
        })
        .collect()
}

/// Expand tabs to the next multiple of `tab_size`, advancing `column` past `text`
fn expand_tabs(text: &str, column: &mut usize, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\t' {
            let spaces = tab_size - (*column % tab_size);
            out.extend(std::iter::repeat(' ').take(spaces));
            *column += spaces;
        } else {
            out.push(ch);
            *column += ch.width().unwrap_or(0);
        }
    }
    out
}

/// Writes highlighted documents to a terminal
pub struct Painter<W: Write> {
    out: W,
    /// Background of marked pairs
    pub pair_mark: Color,
    tab_size: usize,
    /// Display column within the line being painted
    column: usize,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pair_mark: Color::Rgb(0xff, 0xbb, 0x77),
            tab_size: 4,
            column: 0,
        }
    }

    /// Expand tabs to this many columns
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Paint every line of `doc`, then flush
    pub fn paint(
        &mut self,
        doc: &SyntaxDocument,
        styles: &StyleTable,
        decorations: &[Decoration],
    ) -> Result<()> {
        let marks: Vec<Range<usize>> = decorations
            .iter()
            .filter_map(|d| match d {
                Decoration::PairMark(r) => Some(r.clone()),
                _ => None,
            })
            .collect();
        let gutter = decorations.iter().find_map(|d| match d {
            Decoration::Gutter {
                width,
                current_line,
                ..
            } => Some((*width, *current_line)),
            _ => None,
        });

        let buffer = doc.buffer();
        for line in 0..buffer.line_count() {
            if let Some((width, current_line)) = gutter {
                self.paint_line_number(line, width, line == current_line)?;
            }
            self.column = 0;
            let start = buffer.line_start(line).unwrap_or(0);
            let end = buffer.line_end(line).unwrap_or(start);
            for span in segments(doc, styles, start, end) {
                for (piece, marked) in mark_pieces(span.start..span.end, &marks) {
                    let style = if marked {
                        span.style.with_bg(self.pair_mark)
                    } else {
                        span.style
                    };
                    let text = doc.text_range(piece.start, piece.len())?;
                    self.write_styled(text, style)?;
                }
            }
            queue!(self.out, Print("\n"))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn paint_line_number(&mut self, line: usize, width: usize, current: bool) -> Result<()> {
        let attr = if current {
            Attribute::Bold
        } else {
            Attribute::Dim
        };
        queue!(
            self.out,
            SetAttribute(attr),
            Print(format!("{:>width$} ", line + 1, width = width)),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }

    fn write_styled(&mut self, text: &str, style: Style) -> Result<()> {
        let text = expand_tabs(text, &mut self.column, self.tab_size);
        if style.is_default() {
            queue!(self.out, Print(text))?;
            return Ok(());
        }
        if let Some(fg) = term_color(style.fg) {
            queue!(self.out, SetForegroundColor(fg))?;
        }
        if let Some(bg) = term_color(style.bg) {
            queue!(self.out, SetBackgroundColor(bg))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(self.out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(self.out, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(self.out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
        Ok(())
    }
}
