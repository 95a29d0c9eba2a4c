//! Editor add-on components
//!
//! Components are optional decorations attached to a document view:
//! the pair marker and the line-number gutter. They are created from a
//! static table of named factories and owned by a [`Sessions`] table
//! keyed by session id. Installing and uninstalling is explicit.

use std::collections::HashMap;
use std::ops::Range;

use tracing::debug;

use crate::document::SyntaxDocument;
use crate::error::{PaneError, Result};

/// Minimum number of digits the line-number gutter reserves
pub const MIN_GUTTER_DIGITS: usize = 2;

/// Something a component asks the renderer to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Highlight the background of a byte range
    PairMark(Range<usize>),
    /// Line-number gutter
    Gutter {
        width: usize,
        current_line: usize,
        line_count: usize,
    },
}

/// An add-on attached to one session's document.
///
/// The change hooks return true when the component's decorations changed
/// and the view should be repainted.
pub trait Component {
    fn name(&self) -> &'static str;

    fn install(&mut self, doc: &SyntaxDocument);

    fn deinstall(&mut self);

    fn caret_moved(&mut self, doc: &SyntaxDocument, pos: usize) -> bool;

    fn document_changed(&mut self, doc: &SyntaxDocument) -> bool;

    fn decorations(&self, out: &mut Vec<Decoration>);
}

/// Marks the paired token under the caret and its partner
#[derive(Debug, Default)]
pub struct PairsMarker {
    marks: Vec<Range<usize>>,
}

impl PairsMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &[Range<usize>] {
        &self.marks
    }
}

impl Component for PairsMarker {
    fn name(&self) -> &'static str {
        "pairs-marker"
    }

    fn install(&mut self, _doc: &SyntaxDocument) {
        self.marks.clear();
    }

    fn deinstall(&mut self) {
        self.marks.clear();
    }

    fn caret_moved(&mut self, doc: &SyntaxDocument, pos: usize) -> bool {
        let mut marks = Vec::new();
        if let Some(token) = doc.token_at(pos).filter(|t| t.is_paired()) {
            marks.push(token.range());
            if let Some(other) = doc.pair_for(token) {
                marks.push(other.range());
            }
        }
        marks.sort_by_key(|r| r.start);
        if marks == self.marks {
            return false;
        }
        self.marks = marks;
        true
    }

    fn document_changed(&mut self, _doc: &SyntaxDocument) -> bool {
        // Marked offsets are stale after an edit
        let had_marks = !self.marks.is_empty();
        self.marks.clear();
        had_marks
    }

    fn decorations(&self, out: &mut Vec<Decoration>) {
        out.extend(self.marks.iter().cloned().map(Decoration::PairMark));
    }
}

/// Line-number gutter
#[derive(Debug, Default)]
pub struct LineNumbersRuler {
    digits: usize,
    line_count: usize,
    current_line: usize,
}

impl LineNumbersRuler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits reserved for line numbers
    pub fn width(&self) -> usize {
        self.digits
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Refresh the width and line count, reporting whether either changed
    fn update_size(&mut self, doc: &SyntaxDocument) -> bool {
        let line_count = doc.line_count();
        let digits = line_count.to_string().len().max(MIN_GUTTER_DIGITS);
        let changed = digits != self.digits || line_count != self.line_count;
        self.digits = digits;
        self.line_count = line_count;
        changed
    }
}

impl Component for LineNumbersRuler {
    fn name(&self) -> &'static str {
        "line-numbers"
    }

    fn install(&mut self, doc: &SyntaxDocument) {
        self.update_size(doc);
        self.current_line = 0;
    }

    fn deinstall(&mut self) {
        self.digits = 0;
        self.line_count = 0;
    }

    fn caret_moved(&mut self, doc: &SyntaxDocument, pos: usize) -> bool {
        let line = doc.line_number_at(pos);
        if line == self.current_line {
            return false;
        }
        self.current_line = line;
        true
    }

    fn document_changed(&mut self, doc: &SyntaxDocument) -> bool {
        let resized = self.update_size(doc);
        let line = self.current_line.min(self.line_count.saturating_sub(1));
        let moved = line != self.current_line;
        self.current_line = line;
        resized || moved
    }

    fn decorations(&self, out: &mut Vec<Decoration>) {
        out.push(Decoration::Gutter {
            width: self.digits,
            current_line: self.current_line,
            line_count: self.line_count,
        });
    }
}

/// A named constructor for one component
pub struct ComponentFactory {
    pub name: &'static str,
    pub create: fn() -> Box<dyn Component>,
}

fn new_pairs_marker() -> Box<dyn Component> {
    Box::new(PairsMarker::new())
}

fn new_line_numbers() -> Box<dyn Component> {
    Box::new(LineNumbersRuler::new())
}

/// Every component this crate ships with
pub const BUILTIN_COMPONENTS: &[ComponentFactory] = &[
    ComponentFactory {
        name: "pairs-marker",
        create: new_pairs_marker,
    },
    ComponentFactory {
        name: "line-numbers",
        create: new_line_numbers,
    },
];

/// Stable identifier of one editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

/// Ownership table of installed components per session
pub struct Sessions {
    factories: &'static [ComponentFactory],
    next_id: u64,
    installed: HashMap<SessionId, Vec<Box<dyn Component>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::with_factories(BUILTIN_COMPONENTS)
    }

    pub fn with_factories(factories: &'static [ComponentFactory]) -> Self {
        Self {
            factories,
            next_id: 0,
            installed: HashMap::new(),
        }
    }

    /// Allocate a session with no components
    pub fn open(&mut self) -> SessionId {
        self.next_id += 1;
        let id = SessionId(self.next_id);
        self.installed.insert(id, Vec::new());
        id
    }

    /// Build a component by name
    pub fn create(&self, name: &str) -> Result<Box<dyn Component>> {
        self.factories
            .iter()
            .find(|f| f.name == name)
            .map(|f| (f.create)())
            .ok_or_else(|| PaneError::UnknownComponent(name.to_string()))
    }

    /// Create and install the named components.
    ///
    /// Nothing is installed if any name is unknown.
    pub fn install<S: AsRef<str>>(
        &mut self,
        session: SessionId,
        names: &[S],
        doc: &SyntaxDocument,
    ) -> Result<()> {
        let mut created = names
            .iter()
            .map(|n| self.create(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        for component in &mut created {
            component.install(doc);
            debug!(session = session.0, component = component.name(), "installed component");
        }
        self.installed.entry(session).or_default().extend(created);
        Ok(())
    }

    /// Deinstall and drop every component of `session`, returning how many there were
    pub fn uninstall(&mut self, session: SessionId) -> usize {
        let Some(mut components) = self.installed.remove(&session) else {
            return 0;
        };
        for component in &mut components {
            component.deinstall();
            debug!(session = session.0, component = component.name(), "removed component");
        }
        components.len()
    }

    pub fn is_open(&self, session: SessionId) -> bool {
        self.installed.contains_key(&session)
    }

    /// Names of the components installed in `session`
    pub fn names(&self, session: SessionId) -> Vec<&'static str> {
        self.installed
            .get(&session)
            .map(|cs| cs.iter().map(|c| c.name()).collect())
            .unwrap_or_default()
    }

    /// Tell every component of `session` that the caret moved; true if any wants a repaint
    pub fn caret_moved(&mut self, session: SessionId, doc: &SyntaxDocument, pos: usize) -> bool {
        self.installed.get_mut(&session).map_or(false, |cs| {
            cs.iter_mut()
                .fold(false, |repaint, c| c.caret_moved(doc, pos) | repaint)
        })
    }

    /// Tell every component of `session` that the text changed; true if any wants a repaint
    pub fn document_changed(&mut self, session: SessionId, doc: &SyntaxDocument) -> bool {
        self.installed.get_mut(&session).map_or(false, |cs| {
            cs.iter_mut()
                .fold(false, |repaint, c| c.document_changed(doc) | repaint)
        })
    }

    /// Decorations of every component in `session`, in install order
    pub fn decorations(&self, session: SessionId) -> Vec<Decoration> {
        let mut out = Vec::new();
        if let Some(cs) = self.installed.get(&session) {
            for c in cs {
                c.decorations(&mut out);
            }
        }
        out
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Self::new()
    }
}
