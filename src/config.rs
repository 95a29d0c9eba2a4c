//! Configuration file support
//!
//! Loads settings from ~/.synpane.toml (or %USERPROFILE%\.synpane.toml on Windows)
//!
//! Example:
//! ```text
//! # synpane configuration
//! tab-size = 4
//! show-line-numbers = true
//! components = ["pairs-marker", "line-numbers"]
//! undo-limit = 500
//! wrap-search = false
//!
//! [styles.KEYWORD]
//! fg = "bright-blue"
//! bold = true
//!
//! [styles.COMMENT]
//! fg = "#6a9955"
//! italic = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PaneError, Result};
use crate::syntax::{Color, Style, StyleTable, TokenType};

/// Style override for one token type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleEntry {
    pub fn to_style(&self) -> Result<Style> {
        let mut style = Style::default();
        if let Some(fg) = &self.fg {
            style.fg = Color::parse(fg)?;
        }
        if let Some(bg) = &self.bg {
            style.bg = Color::parse(bg)?;
        }
        style.bold = self.bold;
        style.italic = self.italic;
        style.underline = self.underline;
        Ok(style)
    }
}

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Spaces per indentation level
    pub tab_size: usize,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Components installed for every document, by registry name
    pub components: Vec<String>,
    /// Undo units kept per document
    pub undo_limit: usize,
    /// Whether find wraps around at the end of the document
    pub wrap_search: bool,
    /// Style overrides keyed by token type name
    pub styles: BTreeMap<String, StyleEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_size: 4,
            show_line_numbers: true,
            components: vec!["pairs-marker".to_string(), "line-numbers".to_string()],
            undo_limit: 1000,
            wrap_search: true,
            styles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".synpane.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".synpane.toml"))
        }
    }

    /// Load configuration from the default path.
    ///
    /// A missing or malformed file yields the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration text, clamping numeric settings to their ranges
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.tab_size = config.tab_size.clamp(1, 16);
        config.undo_limit = config.undo_limit.max(1);
        Ok(config)
    }

    /// Save current configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string(self).map_err(|e| PaneError::Message(e.to_string()))?;
        fs::write(path, format!("# synpane configuration\n\n{}", contents))?;
        Ok(())
    }

    /// The default style table with this file's overrides applied.
    ///
    /// Entries naming an unknown token type or color are skipped.
    pub fn style_table(&self) -> StyleTable {
        let overrides = self.styles.iter().filter_map(|(name, entry)| {
            match name.parse::<TokenType>().and_then(|t| Ok((t, entry.to_style()?))) {
                Ok(pair) => Some(pair),
                Err(e) => {
                    warn!(name = %name, error = %e, "skipping style entry");
                    None
                }
            }
        });
        StyleTable::default().merged(overrides)
    }
}
