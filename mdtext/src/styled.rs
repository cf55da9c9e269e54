use serde::{Deserialize, Serialize};

use crate::style::Attributes;

/// A contiguous piece of text sharing one attribute overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub attributes: Attributes,
}

/// Flat, run-annotated text.
///
/// Adjacent runs never share attributes and no run is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyledText {
    runs: Vec<Run>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`, extending the last run when the attributes match.
    pub fn push(&mut self, text: &str, attributes: &Attributes) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.attributes == *attributes => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                attributes: attributes.clone(),
            }),
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The characters without any attributes.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}
