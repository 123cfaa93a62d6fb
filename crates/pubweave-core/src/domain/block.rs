//! Parsed input representation

use serde::{Deserialize, Serialize};

/// One citation block from the input: citation text plus an optional URL
/// line and an optional comment line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationBlock {
    pub citation_text: String,
    pub url: Option<String>,
    pub comment: Option<String>,
}

impl CitationBlock {
    pub fn new(citation_text: impl Into<String>) -> Self {
        Self {
            citation_text: citation_text.into(),
            url: None,
            comment: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Lines the identifier extractor scans, citation text first.
    pub fn scan_lines(&self) -> Vec<&str> {
        let mut lines = vec![self.citation_text.as_str()];
        if let Some(url) = &self.url {
            lines.push(url.as_str());
        }
        lines
    }
}

/// A named section of the input, holding its blocks in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub blocks: Vec<CitationBlock>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
        }
    }
}
