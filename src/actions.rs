//! Line-oriented editing actions
//!
//! Each action takes the current selection, edits the document as a
//! single undo unit and returns the selection to show afterwards.

use regex::Regex;

use crate::document::SyntaxDocument;
use crate::error::Result;

/// Comment prefix used when the lexer does not name one
pub const DEFAULT_LINE_COMMENT: &str = "//";

/// A selected byte range; `start == end` is a plain caret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Selection between two offsets in either order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Byte range covering every line the selection touches, newline excluded.
///
/// A selection ending at the start of a line does not include that line.
fn line_span(doc: &SyntaxDocument, sel: Selection) -> (usize, usize) {
    let buffer = doc.buffer();
    let first = buffer.line_number_at(sel.start);
    let last = if sel.is_empty() {
        first
    } else {
        buffer.line_number_at(sel.end - 1)
    };
    let start = buffer.line_start(first).unwrap_or(0);
    let end = buffer.line_end(last).unwrap_or(doc.len());
    (start, end)
}

/// Replace the selected lines with `f` applied to each one
fn rewrite_lines(
    doc: &mut SyntaxDocument,
    sel: Selection,
    f: impl Fn(&str) -> String,
) -> Result<Selection> {
    let (start, end) = line_span(doc, sel);
    let rewritten = doc
        .text_range(start, end - start)?
        .split('\n')
        .map(f)
        .collect::<Vec<_>>()
        .join("\n");
    doc.edit_group(|doc| doc.replace(start, end - start, &rewritten))?;
    Ok(Selection::new(start, start + rewritten.len()))
}

/// Comment out the selected lines, or uncomment them when all are comments
pub fn toggle_comments(doc: &mut SyntaxDocument, sel: Selection) -> Result<Selection> {
    let prefix = doc
        .lexer()
        .and_then(|l| l.line_comment())
        .unwrap_or(DEFAULT_LINE_COMMENT)
        .to_string();
    let pattern = Regex::new(&format!(r"^(\s*)({}\s?)(.*)$", regex::escape(&prefix)))?;

    let (start, end) = line_span(doc, sel);
    let all_comments = doc
        .text_range(start, end - start)?
        .split('\n')
        .all(|line| pattern.is_match(line));

    rewrite_lines(doc, sel, |line| {
        if all_comments {
            pattern.replace(line, "$1$3").into_owned()
        } else {
            format!("{} {}", prefix, line)
        }
    })
}

/// Indent the selected lines by `tab_size` spaces, or insert a tab at the caret
pub fn indent(doc: &mut SyntaxDocument, sel: Selection, tab_size: usize) -> Result<Selection> {
    if sel.is_empty() {
        doc.insert(sel.start, "\t")?;
        return Ok(Selection::caret(sel.start + 1));
    }
    let tab = " ".repeat(tab_size);
    rewrite_lines(doc, sel, |line| format!("{}{}", tab, line))
}

/// Strip up to one indentation level from the selected lines
pub fn unindent(doc: &mut SyntaxDocument, sel: Selection, tab_size: usize) -> Result<Selection> {
    rewrite_lines(doc, sel, |line| {
        if let Some(rest) = line.strip_prefix('\t') {
            return rest.to_string();
        }
        let spaces = line
            .bytes()
            .take(tab_size)
            .take_while(|&b| b == b' ')
            .count();
        line[spaces..].to_string()
    })
}

/// Offset of a 1-based line and display column, both clamped to the document
pub fn goto_line(doc: &SyntaxDocument, line: usize, column: usize) -> usize {
    let buffer = doc.buffer();
    let line = line.clamp(1, buffer.line_count()) - 1;
    buffer
        .offset_at_column(line, column.saturating_sub(1))
        .unwrap_or(doc.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::python_language;

    fn doc(text: &str) -> SyntaxDocument {
        SyntaxDocument::with_text(None, text)
    }

    #[test]
    fn test_selection_normalizes() {
        let sel = Selection::new(9, 2);
        assert_eq!(sel, Selection { start: 2, end: 9 });
        assert_eq!(sel.len(), 7);
        assert!(Selection::caret(4).is_empty());
    }

    #[test]
    fn test_comment_and_uncomment() {
        let mut d = doc("a();\n  b();\nc();");
        let sel = toggle_comments(&mut d, Selection::new(1, 8)).unwrap();
        assert_eq!(d.text(), "// a();\n//   b();\nc();");
        assert_eq!(sel, Selection::new(0, 17));

        toggle_comments(&mut d, sel).unwrap();
        assert_eq!(d.text(), "a();\n  b();\nc();");
    }

    #[test]
    fn test_mixed_lines_get_commented() {
        let mut d = doc("// a\nb");
        toggle_comments(&mut d, Selection::new(0, 6)).unwrap();
        assert_eq!(d.text(), "// // a\n// b");
    }

    #[test]
    fn test_uncomment_keeps_indent() {
        let mut d = doc("    //x");
        toggle_comments(&mut d, Selection::caret(0)).unwrap();
        assert_eq!(d.text(), "    x");
    }

    #[test]
    fn test_toggle_is_one_undo_unit() {
        let mut d = doc("a\nb");
        toggle_comments(&mut d, Selection::new(0, 3)).unwrap();
        d.undo().unwrap();
        assert_eq!(d.text(), "a\nb");
        assert!(!d.can_undo());
    }

    #[test]
    fn test_lexer_comment_prefix() {
        let mut d = SyntaxDocument::with_text(Some(Box::new(python_language().unwrap())), "x = 1");
        toggle_comments(&mut d, Selection::caret(0)).unwrap();
        assert_eq!(d.text(), "# x = 1");
    }

    #[test]
    fn test_selection_ending_at_line_start() {
        let mut d = doc("a\nb");
        toggle_comments(&mut d, Selection::new(0, 2)).unwrap();
        assert_eq!(d.text(), "// a\nb");
    }

    #[test]
    fn test_indent() {
        let mut d = doc("a\nb");
        let sel = indent(&mut d, Selection::new(0, 3), 4).unwrap();
        assert_eq!(d.text(), "    a\n    b");
        assert_eq!(sel, Selection::new(0, 11));

        let sel = unindent(&mut d, sel, 4).unwrap();
        assert_eq!(d.text(), "a\nb");
        assert_eq!(sel, Selection::new(0, 3));
    }

    #[test]
    fn test_indent_caret_inserts_tab() {
        let mut d = doc("ab");
        let sel = indent(&mut d, Selection::caret(1), 4).unwrap();
        assert_eq!(d.text(), "a\tb");
        assert_eq!(sel, Selection::caret(2));
    }

    #[test]
    fn test_unindent_partial() {
        let mut d = doc("  a\n\tb\nc");
        unindent(&mut d, Selection::new(0, 8), 4).unwrap();
        assert_eq!(d.text(), "a\nb\nc");
    }

    #[test]
    fn test_goto_line() {
        let d = doc("ab\n你好x\n");
        assert_eq!(goto_line(&d, 1, 1), 0);
        assert_eq!(goto_line(&d, 2, 1), 3);
        // Column 3 is the second wide char
        assert_eq!(goto_line(&d, 2, 3), 6);
        assert_eq!(goto_line(&d, 2, 99), 10);
        assert_eq!(goto_line(&d, 0, 1), 0);
        assert_eq!(goto_line(&d, 99, 5), 11);
    }
}
