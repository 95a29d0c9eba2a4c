//! Syntax document
//!
//! [`SyntaxDocument`] owns the backing text, the optional lexer and the
//! token index. Every content change goes through it so the index is
//! rebuilt before any listener or query can observe the new text. It
//! also tracks the undo history and publishes `can-undo`/`can-redo`
//! transitions to property listeners.

use std::fmt;

use regex::Regex;
use tracing::{debug, error};

use crate::error::Result;
use crate::history::{EditOperation, UndoHistory};
use crate::index::{TokenIndex, TokenRange};
use crate::pairs;
use crate::search::SnapshotMatcher;
use crate::syntax::{Lexer, Token};
use crate::text::{MutationPhase, TextBuffer, TextEvent};

/// Observable document properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    CanUndo,
    CanRedo,
}

impl Property {
    pub fn name(&self) -> &'static str {
        match self {
            Property::CanUndo => "can-undo",
            Property::CanRedo => "can-redo",
        }
    }
}

/// A property transition delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyChange {
    pub property: Property,
    pub old: bool,
    pub new: bool,
}

/// Handle returned when subscribing; used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type PropertyCallback = Box<dyn FnMut(&PropertyChange)>;
type TextCallback = Box<dyn FnMut(MutationPhase, &TextEvent)>;

/// Token-indexed text document
pub struct SyntaxDocument {
    buffer: TextBuffer,
    lexer: Option<Box<dyn Lexer>>,
    index: TokenIndex,
    history: UndoHistory,
    can_undo: bool,
    can_redo: bool,
    next_listener: u64,
    property_listeners: Vec<(ListenerId, Property, PropertyCallback)>,
    text_listeners: Vec<(ListenerId, TextCallback)>,
}

impl SyntaxDocument {
    /// Create an empty document
    pub fn new(lexer: Option<Box<dyn Lexer>>) -> Self {
        let mut doc = Self {
            buffer: TextBuffer::new(),
            lexer,
            index: TokenIndex::absent(),
            history: UndoHistory::new(),
            can_undo: false,
            can_redo: false,
            next_listener: 0,
            property_listeners: Vec::new(),
            text_listeners: Vec::new(),
        };
        doc.parse();
        doc
    }

    /// Create a document holding `text`; loading is not an undoable edit
    pub fn with_text(lexer: Option<Box<dyn Lexer>>, text: &str) -> Self {
        let mut doc = Self::new(lexer);
        doc.buffer = TextBuffer::from(text);
        doc.parse();
        doc
    }

    /// Limit the number of undo units kept
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.history = UndoHistory::with_max_size(limit);
        self.update_undo_state();
        self
    }

    /// Swap the lexer and re-tokenize
    pub fn set_lexer(&mut self, lexer: Option<Box<dyn Lexer>>) {
        self.lexer = lexer;
        self.parse();
    }

    pub fn lexer(&self) -> Option<&dyn Lexer> {
        self.lexer.as_deref()
    }

    fn parse(&mut self) {
        self.index.rebuild(self.lexer.as_deref(), self.buffer.text());
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Text of `[offset, offset + length)`
    pub fn text_range(&self, offset: usize, length: usize) -> Result<&str> {
        self.buffer.text_range(offset, length)
    }

    /// The backing store, for line and column lookups
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn token_index(&self) -> &TokenIndex {
        &self.index
    }

    // Mutations

    /// Insert `text` at `offset`
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.apply_insert(offset, text)?;
        self.history.record(EditOperation::insert(offset, text));
        self.update_undo_state();
        Ok(())
    }

    /// Remove `length` bytes at `offset`, returning the removed text
    pub fn remove(&mut self, offset: usize, length: usize) -> Result<String> {
        let removed = self.apply_remove(offset, length)?;
        self.history.record(EditOperation::remove(offset, removed.as_str()));
        self.update_undo_state();
        Ok(removed)
    }

    /// Replace `length` bytes at `offset` with `text` as a single undo unit
    pub fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<()> {
        self.buffer.text_range(offset, length)?;
        let removed = self.apply_remove(offset, length)?;
        self.apply_insert(offset, text)?;
        self.history.record(EditOperation::replace(offset, removed, text));
        self.update_undo_state();
        Ok(())
    }

    /// Run `f` with every edit it makes collected into one undo unit
    pub fn edit_group<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.history.begin_group();
        let result = f(self);
        self.history.end_group();
        self.update_undo_state();
        result
    }

    fn apply_insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.buffer.text_range(offset, 0)?;
        if text.is_empty() {
            return Ok(());
        }
        let event = TextEvent::Insert {
            offset,
            text: text.to_string(),
        };
        self.fire_text_event(MutationPhase::Before, &event);
        self.buffer.insert(offset, text)?;
        self.parse();
        self.fire_text_event(MutationPhase::After, &event);
        Ok(())
    }

    fn apply_remove(&mut self, offset: usize, length: usize) -> Result<String> {
        let removed = self.buffer.text_range(offset, length)?.to_string();
        if removed.is_empty() {
            return Ok(removed);
        }
        let event = TextEvent::Remove {
            offset,
            text: removed,
        };
        self.fire_text_event(MutationPhase::Before, &event);
        self.buffer.remove(offset, length)?;
        self.parse();
        self.fire_text_event(MutationPhase::After, &event);
        match event {
            TextEvent::Remove { text, .. } | TextEvent::Insert { text, .. } => Ok(text),
        }
    }

    // Undo / redo

    /// Revert the most recent undo unit. Returns false when there is none.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(unit) = self.history.pop_undo() else {
            return Ok(false);
        };
        debug!(operations = unit.len(), "undo");
        let applied = unit
            .iter()
            .rev()
            .try_for_each(|op| self.apply_operation(&op.inverse()));
        self.update_undo_state();
        applied.map(|()| true)
    }

    /// Re-apply the most recently undone unit. Returns false when there is none.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(unit) = self.history.pop_redo() else {
            return Ok(false);
        };
        debug!(operations = unit.len(), "redo");
        let applied = unit.iter().try_for_each(|op| self.apply_operation(op));
        self.update_undo_state();
        applied.map(|()| true)
    }

    fn apply_operation(&mut self, op: &EditOperation) -> Result<()> {
        let result = self
            .apply_remove(op.offset, op.deleted.len())
            .and_then(|_| self.apply_insert(op.offset, &op.inserted));
        if let Err(e) = &result {
            error!(offset = op.offset, error = %e, "history out of step with document");
        }
        result
    }

    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    pub fn can_redo(&self) -> bool {
        self.can_redo
    }

    /// Drop all undo and redo units
    pub fn discard_history(&mut self) {
        self.history.clear();
        self.update_undo_state();
    }

    fn update_undo_state(&mut self) {
        let can_undo = self.history.can_undo();
        if can_undo != self.can_undo {
            self.can_undo = can_undo;
            self.fire_property(Property::CanUndo, !can_undo, can_undo);
        }
        let can_redo = self.history.can_redo();
        if can_redo != self.can_redo {
            self.can_redo = can_redo;
            self.fire_property(Property::CanRedo, !can_redo, can_redo);
        }
    }

    // Listeners

    fn next_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }

    /// Subscribe to transitions of `property`
    pub fn add_property_listener(
        &mut self,
        property: Property,
        listener: impl FnMut(&PropertyChange) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.property_listeners.push((id, property, Box::new(listener)));
        id
    }

    pub fn remove_property_listener(&mut self, id: ListenerId) -> bool {
        let before = self.property_listeners.len();
        self.property_listeners.retain(|(lid, _, _)| *lid != id);
        self.property_listeners.len() != before
    }

    /// Subscribe to text changes; called before and after each change
    pub fn add_text_listener(
        &mut self,
        listener: impl FnMut(MutationPhase, &TextEvent) + 'static,
    ) -> ListenerId {
        let id = self.next_id();
        self.text_listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_text_listener(&mut self, id: ListenerId) -> bool {
        let before = self.text_listeners.len();
        self.text_listeners.retain(|(lid, _)| *lid != id);
        self.text_listeners.len() != before
    }

    fn fire_property(&mut self, property: Property, old: bool, new: bool) {
        let change = PropertyChange { property, old, new };
        for (_, p, listener) in &mut self.property_listeners {
            if *p == property {
                listener(&change);
            }
        }
    }

    fn fire_text_event(&mut self, phase: MutationPhase, event: &TextEvent) {
        for (_, listener) in &mut self.text_listeners {
            listener(phase, event);
        }
    }

    // Queries

    /// Token containing `pos`, end offset inclusive
    pub fn token_at(&self, pos: usize) -> Option<&Token> {
        if pos > self.len() {
            return None;
        }
        self.index.token_at(pos)
    }

    /// Tokens overlapping `[start, end)`
    pub fn tokens(&self, start: usize, end: usize) -> TokenRange<'_> {
        self.index.tokens(start, end)
    }

    /// Partner of a paired token
    pub fn pair_for(&self, token: &Token) -> Option<&Token> {
        pairs::pair_for(&self.index, token)
    }

    /// Number of lines, at least 1
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Zero-based line holding `pos`
    pub fn line_number_at(&self, pos: usize) -> usize {
        self.buffer.line_number_at(pos)
    }

    /// Matcher over the text from `start` to the end of the document
    pub fn matcher(&self, pattern: &Regex, start: usize) -> Option<SnapshotMatcher> {
        self.matcher_range(pattern, start, self.len().saturating_sub(start))
    }

    /// Matcher over a snapshot of `[start, start + length)`, clamped to the document.
    ///
    /// `None` for an empty document, a start at or past the end, or a
    /// range the store cannot serve.
    pub fn matcher_range(
        &self,
        pattern: &Regex,
        start: usize,
        length: usize,
    ) -> Option<SnapshotMatcher> {
        let len = self.len();
        if len == 0 || start >= len {
            return None;
        }
        let length = length.min(len - start);
        match self.buffer.text_range(start, length) {
            Ok(snapshot) => Some(SnapshotMatcher::new(pattern.clone(), start, snapshot)),
            Err(e) => {
                error!(offset = start, length, error = %e, "cannot read search range");
                None
            }
        }
    }
}

impl Default for SyntaxDocument {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for SyntaxDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxDocument")
            .field("lexer", &self.lexer.as_ref().map(|l| l.name()))
            .field("len", &self.len())
            .field("tokens", &self.index.len())
            .field("can_undo", &self.can_undo)
            .field("can_redo", &self.can_redo)
            .finish()
    }
}

impl fmt::Display for SyntaxDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexer = self.lexer.as_ref().map_or("none", |l| l.name());
        write!(f, "SyntaxDocument({}, {} tokens)", lexer, self.index.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{c_language, TokenType};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn c_doc(text: &str) -> SyntaxDocument {
        SyntaxDocument::with_text(Some(Box::new(c_language().unwrap())), text)
    }

    fn types(doc: &SyntaxDocument) -> Vec<TokenType> {
        doc.tokens(0, doc.len()).map(|t| t.token_type).collect()
    }

    fn record_changes(doc: &mut SyntaxDocument) -> Rc<RefCell<Vec<PropertyChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for property in [Property::CanUndo, Property::CanRedo] {
            let log = Rc::clone(&log);
            doc.add_property_listener(property, move |c| log.borrow_mut().push(*c));
        }
        log
    }

    #[test]
    fn test_empty_document() {
        let doc = c_doc("");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.token_at(0), None);
        assert!(!doc.token_index().is_absent());
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_no_lexer_is_absent() {
        let doc = SyntaxDocument::with_text(None, "int x;");
        assert!(doc.token_index().is_absent());
        assert_eq!(doc.token_at(0), None);
        assert_eq!(doc.tokens(0, 6).count(), 0);
    }

    #[test]
    fn test_retokenize_after_insert() {
        let mut doc = c_doc("int x;");
        assert_eq!(
            types(&doc),
            vec![TokenType::Keyword, TokenType::Identifier, TokenType::Operator]
        );
        assert_eq!(doc.token_at(0).map(|t| t.token_type), Some(TokenType::Keyword));

        doc.insert(0, "//").unwrap();
        assert_eq!(doc.token_at(0).map(|t| t.token_type), Some(TokenType::Comment));
        assert_eq!(types(&doc), vec![TokenType::Comment]);
    }

    #[test]
    fn test_listener_sees_fresh_tokens() {
        let mut doc = c_doc("int x;");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        doc.add_text_listener(move |phase, event| {
            sink.borrow_mut().push((phase, event.offset(), event.len()))
        });
        doc.insert(0, "//").unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![(MutationPhase::Before, 0, 2), (MutationPhase::After, 0, 2)]
        );
    }

    #[test]
    fn test_token_at_past_end() {
        let doc = c_doc("int x;");
        assert!(doc.token_at(6).is_some());
        assert_eq!(doc.token_at(7), None);
    }

    #[test]
    fn test_undo_redo_flags() {
        let mut doc = c_doc("");
        let log = record_changes(&mut doc);

        doc.insert(0, "x").unwrap();
        assert!(doc.can_undo());
        assert!(!doc.can_redo());

        assert!(doc.undo().unwrap());
        assert!(!doc.can_undo());
        assert!(doc.can_redo());
        assert_eq!(doc.text(), "");

        assert!(doc.redo().unwrap());
        assert!(doc.can_undo());
        assert!(!doc.can_redo());
        assert_eq!(doc.text(), "x");

        let expected = vec![
            PropertyChange { property: Property::CanUndo, old: false, new: true },
            PropertyChange { property: Property::CanUndo, old: true, new: false },
            PropertyChange { property: Property::CanRedo, old: false, new: true },
            PropertyChange { property: Property::CanUndo, old: false, new: true },
            PropertyChange { property: Property::CanRedo, old: true, new: false },
        ];
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn test_flags_fire_only_on_transition() {
        let mut doc = c_doc("");
        let log = record_changes(&mut doc);
        doc.insert(0, "a").unwrap();
        doc.insert(1, "b").unwrap();
        doc.remove(0, 1).unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_removed_listener_is_silent() {
        let mut doc = c_doc("");
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = doc.add_property_listener(Property::CanUndo, move |_| *sink.borrow_mut() += 1);
        assert!(doc.remove_property_listener(id));
        assert!(!doc.remove_property_listener(id));
        doc.insert(0, "a").unwrap();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_undo_retokenizes() {
        let mut doc = c_doc("int x;");
        doc.insert(0, "//").unwrap();
        doc.undo().unwrap();
        assert_eq!(doc.text(), "int x;");
        assert_eq!(doc.token_at(0).map(|t| t.token_type), Some(TokenType::Keyword));
        doc.redo().unwrap();
        assert_eq!(doc.token_at(0).map(|t| t.token_type), Some(TokenType::Comment));
    }

    #[test]
    fn test_replace_is_one_unit() {
        let mut doc = c_doc("int x;");
        let parses = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&parses);
        doc.add_text_listener(move |phase, _| {
            if phase == MutationPhase::After {
                *sink.borrow_mut() += 1;
            }
        });

        doc.replace(4, 1, "count").unwrap();
        assert_eq!(doc.text(), "int count;");
        assert_eq!(*parses.borrow(), 2);

        doc.undo().unwrap();
        assert_eq!(doc.text(), "int x;");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_edit_group() {
        let mut doc = c_doc("ab");
        doc.edit_group(|d| {
            d.insert(0, "1")?;
            d.insert(3, "2")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(doc.text(), "1ab2");
        doc.undo().unwrap();
        assert_eq!(doc.text(), "ab");
        doc.redo().unwrap();
        assert_eq!(doc.text(), "1ab2");
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut doc = c_doc("");
        doc.insert(0, "a").unwrap();
        doc.undo().unwrap();
        assert!(doc.can_redo());
        doc.insert(0, "b").unwrap();
        assert!(!doc.can_redo());
        assert!(!doc.redo().unwrap());
    }

    #[test]
    fn test_bad_location_leaves_document_unchanged() {
        let mut doc = c_doc("int x;");
        assert!(doc.insert(99, "a").unwrap_err().is_bad_location());
        assert!(doc.replace(4, 10, "y").unwrap_err().is_bad_location());
        assert_eq!(doc.text(), "int x;");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_pair_for() {
        let doc = c_doc("f(a[1]);");
        let open = *doc.token_at(1).unwrap();
        let close = doc.pair_for(&open).unwrap();
        assert_eq!(close.start, 6);
        assert_eq!(doc.pair_for(close).map(|t| t.start), Some(1));
    }

    #[test]
    fn test_line_queries() {
        let doc = c_doc("a\nb\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_number_at(0), 0);
        assert_eq!(doc.line_number_at(2), 1);
        assert_eq!(doc.line_number_at(40), 2);
    }

    #[test]
    fn test_matcher_range() {
        let doc = c_doc("int x; int y;");
        let re = Regex::new("int").unwrap();
        assert!(SyntaxDocument::default().matcher(&re, 0).is_none());
        assert!(doc.matcher(&re, 13).is_none());

        let m = doc.matcher(&re, 1).unwrap();
        assert_eq!(m.base(), 1);
        let hits: Vec<_> = m.find_iter().collect();
        assert_eq!(hits, vec![6..9]);
        assert_eq!(m.to_document(hits[0].clone()), 7..10);

        let m = doc.matcher_range(&re, 0, 100).unwrap();
        assert_eq!(m.snapshot(), "int x; int y;");
    }

    #[test]
    fn test_matcher_inside_character() {
        let doc = SyntaxDocument::with_text(None, "éfoo");
        let re = Regex::new("foo").unwrap();
        // Byte 1 is inside 'é'
        assert!(doc.matcher(&re, 1).is_none());
        assert!(doc.matcher_range(&re, 0, 1).is_none());
        assert!(doc.matcher_range(&re, 2, 1).is_some());

        let m = doc.matcher(&re, 2).unwrap();
        assert_eq!(m.snapshot(), "foo");
        assert_eq!(m.find_iter().map(|r| m.to_document(r)).collect::<Vec<_>>(), vec![2..5]);
    }

    #[test]
    fn test_display() {
        let doc = c_doc("int x;");
        assert_eq!(doc.to_string(), "SyntaxDocument(C, 3 tokens)");
    }
}
