//! Backing text store
//!
//! Holds the raw document text together with a table of line start
//! offsets. Offsets are bytes; every offset handed to a mutation or a
//! sub-range read must lie on a char boundary.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::{PaneError, Result};

/// A change applied to the text store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEvent {
    /// `text` is (or was) inserted at `offset`
    Insert { offset: usize, text: String },
    /// `text` is (or was) removed starting at `offset`
    Remove { offset: usize, text: String },
}

impl TextEvent {
    pub fn offset(&self) -> usize {
        match self {
            TextEvent::Insert { offset, .. } | TextEvent::Remove { offset, .. } => *offset,
        }
    }

    /// Number of bytes inserted or removed
    pub fn len(&self) -> usize {
        match self {
            TextEvent::Insert { text, .. } | TextEvent::Remove { text, .. } => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether a listener is called before or after the store changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Before,
    After,
}

/// Document text with a line table
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    /// Offset of the first byte of every line; always starts with 0
    line_starts: Vec<usize>,
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            text: String::new(),
            line_starts: vec![0],
        }
    }

    /// Whole text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn check_range(&self, offset: usize, length: usize) -> Result<()> {
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= self.text.len())
            .ok_or_else(|| PaneError::bad_location(offset, length, self.text.len()))?;
        if !self.text.is_char_boundary(offset) || !self.text.is_char_boundary(end) {
            return Err(PaneError::bad_location(offset, length, self.text.len()));
        }
        Ok(())
    }

    /// Text of `[offset, offset + length)`
    pub fn text_range(&self, offset: usize, length: usize) -> Result<&str> {
        self.check_range(offset, length)?;
        Ok(&self.text[offset..offset + length])
    }

    /// Insert `s` at `offset`
    pub fn insert(&mut self, offset: usize, s: &str) -> Result<()> {
        self.check_range(offset, 0)?;
        if s.is_empty() {
            return Ok(());
        }

        let line = self.line_number_at(offset);
        for start in &mut self.line_starts[line + 1..] {
            *start += s.len();
        }
        let new_starts = s.match_indices('\n').map(|(i, _)| offset + i + 1);
        self.line_starts.splice(line + 1..line + 1, new_starts);

        self.text.insert_str(offset, s);
        Ok(())
    }

    /// Remove `length` bytes at `offset`, returning the removed text
    pub fn remove(&mut self, offset: usize, length: usize) -> Result<String> {
        self.check_range(offset, length)?;
        if length == 0 {
            return Ok(String::new());
        }

        let end = offset + length;
        self.line_starts.retain(|&s| s <= offset || s > end);
        for start in &mut self.line_starts {
            if *start > end {
                *start -= length;
            }
        }

        Ok(self.text.drain(offset..end).collect())
    }

    /// Number of lines; an empty buffer still has one
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing `pos`; positions past the end map to the last line
    pub fn line_number_at(&self, pos: usize) -> usize {
        let pos = pos.min(self.text.len());
        self.line_starts.partition_point(|&s| s <= pos) - 1
    }

    /// Offset of the first byte of `line`
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Offset of the end of `line`, not counting its newline
    pub fn line_end(&self, line: usize) -> Option<usize> {
        let next = self.line_starts.get(line + 1).copied();
        match next {
            Some(next) => Some(next - 1),
            None if line < self.line_starts.len() => Some(self.text.len()),
            None => None,
        }
    }

    /// Text of `line` without its newline
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self.line_end(line)?;
        self.text.get(start..end)
    }

    /// Display column of `pos` within its line
    pub fn column_at(&self, pos: usize) -> usize {
        let pos = floor_char_boundary(&self.text, pos.min(self.text.len()));
        let start = self.line_starts[self.line_number_at(pos)];
        self.text[start..pos].width()
    }

    /// Offset of display column `col` on `line`, clamped to the line end
    pub fn offset_at_column(&self, line: usize, col: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let text = self.line_text(line)?;
        let mut current_col = 0;
        for (byte_idx, ch) in text.char_indices() {
            if current_col >= col {
                return Some(start + byte_idx);
            }
            current_col += ch.width().unwrap_or(1);
        }
        Some(start + text.len())
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        let mut buffer = Self::new();
        // Inserting into an empty buffer at 0 cannot fail
        let _ = buffer.insert(0, s);
        buffer
    }
}

/// Nearest char boundary at or before `pos`
fn floor_char_boundary(s: &str, pos: usize) -> usize {
    let mut p = pos;
    while p > 0 && !s.is_char_boundary(p) {
        p -= 1;
    }
    p
}

/// Nearest char boundary at or after `pos`, clamped to the end of `s`
pub(crate) fn ceil_char_boundary(s: &str, pos: usize) -> usize {
    let mut p = pos.min(s.len());
    while !s.is_char_boundary(p) {
        p += 1;
    }
    p
}
