//! Class label table and label naming conventions.
//!
//! The class table binds the classifier's output indices to human labels.
//! Labels ending in `-cut` name the sliced form of a fruit and share the
//! informational content of the whole fruit.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::types::RankedLabels;

/// Literal suffix marking the cut variant of a fruit.
pub const CUT_SUFFIX: &str = "-cut";

/// Ordered, immutable class vocabulary.
///
/// Position `i` names the score at index `i` of every prediction vector.
/// Cloning is cheap and shares the underlying table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    names: Arc<[String]>,
}

impl ClassNames {
    /// Build a class table, rejecting empty tables, blank labels and duplicates.
    pub fn new(names: Vec<String>) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::ValidationError(
                "classes.names must not be empty".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "classes.names has a blank entry at index {i}"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "classes.names contains duplicate label: {name}"
                )));
            }
        }

        Ok(Self {
            names: names.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Label at a given output index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Distinct display names, in table order.
    pub fn display_names(&self) -> Vec<&str> {
        dedup_display(self.iter())
    }
}

/// Strip one trailing `-cut` from a label, if present.
///
/// A label that is only the suffix, or shorter, is returned unchanged.
pub fn strip_cut_suffix(label: &str) -> &str {
    match label.strip_suffix(CUT_SUFFIX) {
        Some(base) if !base.is_empty() => base,
        _ => label,
    }
}

/// Display names for a ranked list, best first.
///
/// A fruit and its cut variant collapse to one entry at the better rank.
pub fn display_names(labels: &RankedLabels) -> Vec<String> {
    dedup_display(labels.iter())
        .into_iter()
        .map(String::from)
        .collect()
}

fn dedup_display<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    labels
        .map(strip_cut_suffix)
        .filter(|name| seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_cut_suffix() {
        assert_eq!(strip_cut_suffix("Mango-cut"), "Mango");
        assert_eq!(strip_cut_suffix("Mango"), "Mango");
        assert_eq!(strip_cut_suffix("cut"), "cut");
        assert_eq!(strip_cut_suffix("Honeydew Melon"), "Honeydew Melon");
    }

    #[test]
    fn test_strip_cut_suffix_only_once() {
        assert_eq!(strip_cut_suffix("Kiwifruit-cut-cut"), "Kiwifruit-cut");
    }

    #[test]
    fn test_strip_cut_suffix_bare_suffix() {
        assert_eq!(strip_cut_suffix("-cut"), "-cut");
    }

    #[test]
    fn test_class_names_rejects_empty() {
        assert!(ClassNames::new(vec![]).is_err());
    }

    #[test]
    fn test_class_names_rejects_blank() {
        let err = ClassNames::new(names(&["Apple", " ", "Pear"])).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_class_names_rejects_duplicates() {
        let err = ClassNames::new(names(&["Apple", "Pear", "Apple"])).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_class_names_preserves_order() {
        let table = ClassNames::new(names(&["B", "A", "C"])).unwrap();
        assert_eq!(table.iter().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        assert_eq!(table.get(1), Some("A"));
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn test_display_names_collapse_cut_variants() {
        let ranked = RankedLabels::new(names(&["Avocado-cut", "Mango", "Avocado", "Lime"]));
        assert_eq!(display_names(&ranked), vec!["Avocado", "Mango", "Lime"]);
    }

    #[test]
    fn test_class_table_display_names() {
        let table = ClassNames::new(names(&["Orange", "Orange-cut", "Pear"])).unwrap();
        assert_eq!(table.display_names(), vec!["Orange", "Pear"]);
    }
}
