//! Categorical label encoding
//!
//! Classes are kept in sorted order, so a label's index is stable between
//! training and serving as long as the persisted class list is reused.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowercase and trim a free-form label for comparisons.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Maps categorical labels to their positional index and back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder on raw labels: unique values in sorted order.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();

        Self {
            classes: classes.into_iter().collect(),
        }
    }

    /// Build an encoder from a persisted class list, keeping its order.
    pub fn from_classes(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Exact-match index of a label
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|class| class == label)
    }

    /// Label stored at `index`
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Stored spelling of `label`, matched case-insensitively after trimming.
    pub fn canonical(&self, label: &str) -> Option<&str> {
        let wanted = normalize_label(label);
        if wanted.is_empty() {
            return None;
        }
        self.classes
            .iter()
            .find(|class| normalize_label(class) == wanted)
            .map(String::as_str)
    }

    /// Check the class list is usable: non-empty, no blank or duplicate labels.
    pub fn check(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("no classes".to_string());
        }

        let mut seen = BTreeSet::new();
        for class in &self.classes {
            let normalized = normalize_label(class);
            if normalized.is_empty() {
                return Err("blank class label".to_string());
            }
            // Case-insensitive duplicates would make canonical lookup ambiguous
            if !seen.insert(normalized) {
                return Err(format!("duplicate class '{class}'"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_sorts_and_dedups() {
        let encoder = LabelEncoder::fit(["Male", "Female", "Male", "Female", "Non-binary"]);
        assert_eq!(encoder.classes(), &["Female", "Male", "Non-binary"]);
        assert_eq!(encoder.encode("Female"), Some(0));
        assert_eq!(encoder.encode("Male"), Some(1));
        assert_eq!(encoder.encode("male"), None);
    }

    #[test]
    fn test_decode_reverses_encode() {
        let encoder = LabelEncoder::fit(["Data Scientist", "Analyst", "Engineer"]);
        for class in encoder.classes() {
            let index = encoder.encode(class).unwrap();
            assert_eq!(encoder.decode(index), Some(class.as_str()));
        }
        assert_eq!(encoder.decode(3), None);
    }

    #[test]
    fn test_canonical_lookup_ignores_case_and_whitespace() {
        let encoder = LabelEncoder::from_classes(vec!["Female".into(), "Male".into()]);
        assert_eq!(encoder.canonical("  FEMALE "), Some("Female"));
        assert_eq!(encoder.canonical("male"), Some("Male"));
        assert_eq!(encoder.canonical("other"), None);
        assert_eq!(encoder.canonical("   "), None);
    }

    #[test]
    fn test_from_classes_keeps_order() {
        let encoder = LabelEncoder::from_classes(vec!["b".into(), "a".into()]);
        assert_eq!(encoder.encode("b"), Some(0));
        assert_eq!(encoder.encode("a"), Some(1));
    }

    #[test]
    fn test_check_rejects_bad_class_lists() {
        assert!(LabelEncoder::from_classes(vec![]).check().is_err());
        assert!(LabelEncoder::from_classes(vec!["Male".into(), "male".into()])
            .check()
            .is_err());
        assert!(LabelEncoder::from_classes(vec![" ".into()]).check().is_err());
        assert!(LabelEncoder::fit(["Female", "Male"]).check().is_ok());
    }

    #[test]
    fn test_serialized_shape() {
        let encoder = LabelEncoder::fit(["Male", "Female"]);
        let json = serde_json::to_value(&encoder).unwrap();
        assert_eq!(json, serde_json::json!({ "classes": ["Female", "Male"] }));
    }
}
