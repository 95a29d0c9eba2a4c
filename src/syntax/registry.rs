//! Language registry
//!
//! A static table of named lexer factories. Documents get their lexer
//! by name or by file extension; nothing is loaded by reflection.

use std::path::Path;

use tracing::debug;

use crate::error::{PaneError, Result};

use super::builtin;
use super::language::LanguageDefinition;
use super::lexer::Lexer;

/// A named constructor for one built-in language
pub struct LanguageFactory {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub create: fn() -> Result<LanguageDefinition>,
}

/// Every language this crate ships with
pub const BUILTIN_LANGUAGES: &[LanguageFactory] = &[
    LanguageFactory {
        name: "C",
        extensions: &["c", "h", "cpp", "hpp", "cc", "cxx"],
        create: builtin::c_language,
    },
    LanguageFactory {
        name: "Rust",
        extensions: &["rs"],
        create: builtin::rust_language,
    },
    LanguageFactory {
        name: "Python",
        extensions: &["py", "pyw", "pyi"],
        create: builtin::python_language,
    },
];

/// Lookup of lexer factories by name and extension
pub struct LanguageRegistry {
    factories: &'static [LanguageFactory],
}

impl LanguageRegistry {
    /// Create a registry over the built-in languages
    pub fn new() -> Self {
        Self {
            factories: BUILTIN_LANGUAGES,
        }
    }

    /// Create a registry over a custom factory table
    pub fn with_factories(factories: &'static [LanguageFactory]) -> Self {
        Self { factories }
    }

    /// Detect language name from filename
    pub fn detect(&self, filename: &Path) -> Option<&'static str> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.factories
            .iter()
            .find(|f| f.extensions.contains(&ext.as_str()))
            .map(|f| f.name)
    }

    /// Build the lexer registered under `name` (case-insensitive)
    pub fn create(&self, name: &str) -> Result<Box<dyn Lexer>> {
        let factory = self
            .factories
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PaneError::UnknownLanguage(name.to_string()))?;
        let lang = (factory.create)()?;
        debug!(language = factory.name, rules = lang.patterns.len(), "created lexer");
        Ok(Box::new(lang))
    }

    /// Build the lexer for a file, if its extension is known
    pub fn for_path(&self, filename: &Path) -> Result<Option<Box<dyn Lexer>>> {
        match self.detect(filename) {
            Some(name) => self.create(name).map(Some),
            None => Ok(None),
        }
    }

    /// List available languages
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.iter().map(|f| f.name).collect();
        names.sort();
        names
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
