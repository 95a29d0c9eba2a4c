//! Search and replace over document text
//!
//! Matching always runs against a snapshot of the text taken when the
//! matcher is built. Ranges reported by a [`SnapshotMatcher`] are
//! relative to its base offset; [`Finder`] translates them back to
//! document offsets.

use std::ops::Range;

use regex::{Captures, Regex, RegexBuilder};

use crate::document::SyntaxDocument;
use crate::error::Result;
use crate::text::ceil_char_boundary;

/// A compiled search pattern
#[derive(Debug, Clone)]
pub struct SearchQuery {
    text: String,
    regex: Regex,
    use_regex: bool,
}

impl SearchQuery {
    /// Compile `text`, escaping it unless `use_regex` is set.
    ///
    /// A malformed regex is reported as [`crate::PaneError::Pattern`].
    pub fn new(text: &str, use_regex: bool, ignore_case: bool) -> Result<Self> {
        let pattern = if use_regex {
            text.to_string()
        } else {
            regex::escape(text)
        };
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(ignore_case)
            .multi_line(true)
            .build()?;
        Ok(Self {
            text: text.to_string(),
            regex,
            use_regex,
        })
    }

    /// The text the query was built from
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_regex(&self) -> bool {
        self.use_regex
    }

    /// Replacement text for one match; `$n` groups expand only in regex mode
    fn expand(&self, caps: &Captures<'_>, replacement: &str) -> String {
        if self.use_regex {
            let mut dst = String::new();
            caps.expand(replacement, &mut dst);
            dst
        } else {
            replacement.to_string()
        }
    }
}

/// A pattern bound to a frozen copy of part of a document
#[derive(Debug, Clone)]
pub struct SnapshotMatcher {
    regex: Regex,
    base: usize,
    snapshot: String,
}

impl SnapshotMatcher {
    pub fn new(regex: Regex, base: usize, snapshot: &str) -> Self {
        Self {
            regex,
            base,
            snapshot: snapshot.to_string(),
        }
    }

    /// Document offset of the first snapshot byte
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// Successive matches, relative to [`base`](Self::base)
    pub fn find_iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.regex.find_iter(&self.snapshot).map(|m| m.range())
    }

    /// Successive matches with their groups, relative to the base
    pub fn captures_iter(&self) -> impl Iterator<Item = Captures<'_>> + '_ {
        self.regex.captures_iter(&self.snapshot)
    }

    /// Translate a relative range to document offsets
    pub fn to_document(&self, range: Range<usize>) -> Range<usize> {
        range.start + self.base..range.end + self.base
    }
}

/// Find/replace driver for one query
#[derive(Debug, Clone)]
pub struct Finder {
    pub query: SearchQuery,
    /// Continue from the top when the end is reached
    pub wrap: bool,
}

impl Finder {
    pub fn new(query: SearchQuery, wrap: bool) -> Self {
        Self { query, wrap }
    }

    /// First non-empty match at or after `start`, with its replacement text.
    ///
    /// A `start` inside a character moves forward to the next one.
    fn first_from(
        &self,
        doc: &SyntaxDocument,
        start: usize,
        replacement: &str,
    ) -> Option<(Range<usize>, String)> {
        let start = ceil_char_boundary(doc.text(), start);
        let matcher = doc.matcher(self.query.regex(), start)?;
        let caps = matcher
            .captures_iter()
            .find(|c| c.get(0).is_some_and(|m| !m.is_empty()))?;
        let range = caps.get(0)?.range();
        Some((matcher.to_document(range), self.query.expand(&caps, replacement)))
    }

    fn next_match(
        &self,
        doc: &SyntaxDocument,
        from: usize,
        replacement: &str,
    ) -> Option<(Range<usize>, String)> {
        self.first_from(doc, from, replacement).or_else(|| {
            if self.wrap && from > 0 {
                self.first_from(doc, 0, replacement)
            } else {
                None
            }
        })
    }

    /// Next match at or after `from`
    pub fn find_next(&self, doc: &SyntaxDocument, from: usize) -> Option<Range<usize>> {
        self.next_match(doc, from, "").map(|(range, _)| range)
    }

    /// Last match ending at or before `from`
    pub fn find_prev(&self, doc: &SyntaxDocument, from: usize) -> Option<Range<usize>> {
        let all = self.mark_all(doc);
        all.iter()
            .rev()
            .find(|r| r.end <= from)
            .or_else(|| if self.wrap { all.last() } else { None })
            .cloned()
    }

    /// Every non-empty match in the document
    pub fn mark_all(&self, doc: &SyntaxDocument) -> Vec<Range<usize>> {
        doc.matcher(self.query.regex(), 0)
            .map(|m| {
                m.find_iter()
                    .filter(|r| !r.is_empty())
                    .map(|r| m.to_document(r))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Replace the next match at or after `from`, returning the range of the new text
    pub fn replace_next(
        &self,
        doc: &mut SyntaxDocument,
        from: usize,
        replacement: &str,
    ) -> Result<Option<Range<usize>>> {
        let Some((range, text)) = self.next_match(doc, from, replacement) else {
            return Ok(None);
        };
        doc.replace(range.start, range.len(), &text)?;
        Ok(Some(range.start..range.start + text.len()))
    }

    /// Replace every match as one undo unit, returning the number replaced
    pub fn replace_all(&self, doc: &mut SyntaxDocument, replacement: &str) -> Result<usize> {
        let edits: Vec<(Range<usize>, String)> = match doc.matcher(self.query.regex(), 0) {
            Some(matcher) => matcher
                .captures_iter()
                .filter_map(|caps| {
                    let m = caps.get(0).filter(|m| !m.is_empty())?;
                    Some((
                        matcher.to_document(m.range()),
                        self.query.expand(&caps, replacement),
                    ))
                })
                .collect(),
            None => return Ok(0),
        };

        doc.edit_group(|doc| {
            for (range, text) in edits.iter().rev() {
                doc.replace(range.start, range.len(), text)?;
            }
            Ok(edits.len())
        })
    }
}
