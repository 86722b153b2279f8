//! Descriptive content for each fruit, keyed by display name.
//!
//! The source file is a JSON object mapping fruit names to HTML-ish text.
//! Names match the class table with the `-cut` suffix removed.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::labels::{strip_cut_suffix, ClassNames};

/// Everything from this marker on is serving advice we don't show.
const SERVE_MARKER: &str = "SERVE";

/// Section headings promoted to `<h3>`, applied in this order.
const HEADINGS: [&str; 8] = [
    "Varieties to Explore",
    "Nutrient Content Claims",
    "Health Claims",
    "STORE",
    "SELECT",
    "Storage",
    "Selection",
    "Nutrition Benefits",
];

/// Read-only fruit info table, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct FruitInfoStore {
    entries: HashMap<String, String>,
}

impl FruitInfoStore {
    /// Load the table from a UTF-8 JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidFruitInfo {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        tracing::debug!("Loaded {} fruit info entries from {:?}", entries.len(), path);
        Ok(Self { entries })
    }

    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw text for a fruit. Cut variants resolve to the whole fruit.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .get(strip_cut_suffix(name))
            .map(String::as_str)
    }

    /// Display-ready HTML for a fruit.
    pub fn info(&self, name: &str) -> Option<String> {
        self.lookup(name).map(format_info)
    }

    /// Display names in the class table that have no entry.
    pub fn check_coverage<'a>(&self, class_names: &'a ClassNames) -> Vec<&'a str> {
        class_names
            .display_names()
            .into_iter()
            .filter(|name| !self.entries.contains_key(*name))
            .collect()
    }
}

/// Trim serving advice and promote known section headings to `<h3>`.
pub fn format_info(raw: &str) -> String {
    let mut text = raw
        .split(SERVE_MARKER)
        .next()
        .unwrap_or_default()
        .to_string();

    for heading in HEADINGS {
        let tag = format!("<h3>{}</h3>", heading.to_uppercase());
        text = text.replace(heading, &tag);
        // The heading is already a block element; drop the line break after it.
        text = text.replace(&format!("{tag}<br>"), &tag);
        text = text.replace(&format!("{tag} <br>"), &tag);
    }
    text
}
