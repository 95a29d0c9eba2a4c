//! Undo/redo history
//!
//! Edits are recorded as [`EditOperation`]s and stacked in units. A unit
//! is undone or redone as a whole; several operations become one unit
//! when they are recorded between [`UndoHistory::begin_group`] and
//! [`UndoHistory::end_group`].

/// A single text change that can be undone/redone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Byte offset where the edit occurred
    pub offset: usize,
    /// Text that was deleted (empty for pure inserts)
    pub deleted: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted: String,
}

impl EditOperation {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            deleted: String::new(),
            inserted: text.into(),
        }
    }

    pub fn remove(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            deleted: text.into(),
            inserted: String::new(),
        }
    }

    pub fn replace(offset: usize, deleted: impl Into<String>, inserted: impl Into<String>) -> Self {
        Self {
            offset,
            deleted: deleted.into(),
            inserted: inserted.into(),
        }
    }

    /// The operation that reverts this one
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted: self.inserted.clone(),
            inserted: self.deleted.clone(),
        }
    }

    /// True when applying the operation changes nothing
    pub fn is_noop(&self) -> bool {
        self.deleted == self.inserted
    }
}

/// Operations undone and redone together, in the order they were applied
pub type UndoUnit = Vec<EditOperation>;

/// Undo and redo stacks of edit units
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo_stack: Vec<UndoUnit>,
    redo_stack: Vec<UndoUnit>,
    pending: UndoUnit,
    depth: usize,
    max_size: usize,
}

impl UndoHistory {
    /// Create a new history with the default limit of 1000 units
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            pending: Vec::new(),
            depth: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record an applied operation.
    ///
    /// Outside a group the operation becomes its own unit.
    pub fn record(&mut self, op: EditOperation) {
        if op.is_noop() {
            return;
        }
        if self.depth > 0 {
            self.pending.push(op);
        } else {
            self.push_unit(vec![op]);
        }
    }

    /// Open a group; groups nest and only the outermost one closes the unit
    pub fn begin_group(&mut self) {
        self.depth += 1;
    }

    /// Close a group, pushing the collected operations as one unit
    pub fn end_group(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0 && !self.pending.is_empty() {
            let unit = std::mem::take(&mut self.pending);
            self.push_unit(unit);
        }
    }

    pub fn in_group(&self) -> bool {
        self.depth > 0
    }

    fn push_unit(&mut self, unit: UndoUnit) {
        self.redo_stack.clear();
        self.undo_stack.push(unit);
        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    /// Take the most recent unit for undoing; it moves to the redo stack
    pub fn pop_undo(&mut self) -> Option<UndoUnit> {
        let unit = self.undo_stack.pop()?;
        self.redo_stack.push(unit.clone());
        Some(unit)
    }

    /// Take the most recently undone unit for redoing; it moves back to the undo stack
    pub fn pop_redo(&mut self) -> Option<UndoUnit> {
        let unit = self.redo_stack.pop()?;
        self.undo_stack.push(unit.clone());
        Some(unit)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending.clear();
        self.depth = 0;
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}
