use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::EncoderError;

/// Maps grade strings to class indices and back.
///
/// Classes are sorted lexicographically at fit time, so `high`, `low`,
/// `medium` become `0`, `1`, `2`. Labels are kept exactly as they appear in
/// the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fits the encoder on every distinct label in `labels`.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = labels
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect();
        LabelEncoder {
            classes: classes.into_iter().collect(),
        }
    }

    pub fn transform(&self, label: &str) -> Result<usize, EncoderError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| EncoderError::UnknownLabel(label.to_string()))
    }

    pub fn inverse_transform(&self, index: usize) -> Result<&str, EncoderError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(EncoderError::IndexOutOfRange {
                index,
                n_classes: self.classes.len(),
            })
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
}
