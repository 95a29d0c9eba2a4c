//! synpane - a token-indexed text model for syntax highlighting editors
//!
//! A [`SyntaxDocument`] keeps its text and a sorted token list in step:
//! every edit re-runs the document's lexer over the whole text before
//! anyone can query the new state. On top of that sit the pair matcher,
//! snapshot search, line actions and the add-on components used by a
//! rendering surface.

pub mod actions;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod index;
pub mod pairs;
pub mod render;
pub mod search;
pub mod syntax;
pub mod text;

pub use actions::Selection;
pub use components::{Component, Decoration, SessionId, Sessions};
pub use config::Config;
pub use document::{ListenerId, Property, PropertyChange, SyntaxDocument};
pub use error::{PaneError, Result};
pub use index::{TokenIndex, TokenRange};
pub use search::{Finder, SearchQuery, SnapshotMatcher};
pub use syntax::{Lexer, Style, StyleTable, Token, TokenType};
pub use text::{MutationPhase, TextEvent};
