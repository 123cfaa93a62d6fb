//! Publisher URL patterns that embed a DOI
//!
//! Each row pairs a publisher with a regex whose `doi` capture group
//! yields the identifier. New publishers are added by appending rows, not
//! by branching logic; callers may also supply their own table.

use regex::Regex;

/// A single publisher URL rule
#[derive(Debug, Clone)]
pub struct PublisherPattern {
    /// Short publisher label, used in logs
    pub publisher: &'static str,
    /// Pattern with a `doi` capture group
    pub regex: Regex,
}

impl PublisherPattern {
    pub fn new(publisher: &'static str, pattern: &str) -> Self {
        Self {
            publisher,
            regex: Regex::new(pattern).expect("invalid publisher pattern"),
        }
    }
}

/// The default publisher table, in match order.
pub fn default_publisher_patterns() -> Vec<PublisherPattern> {
    vec![
        PublisherPattern::new(
            "springer",
            r"(?i)link\.springer\.com/(?:article|chapter)/(?P<doi>10\.\d{4,}/[^\s?#]+)",
        ),
        PublisherPattern::new(
            "wiley",
            r"(?i)onlinelibrary\.wiley\.com/doi/(?:abs/|full/|pdf/|epdf/)?(?P<doi>10\.\d{4,}/[^\s?#]+)",
        ),
        PublisherPattern::new(
            "plos",
            r"(?i)journals\.plos\.org/[a-z]+/article\?id=(?P<doi>10\.\d{4,}/[^\s&#]+)",
        ),
        PublisherPattern::new(
            "frontiers",
            r"(?i)frontiersin\.org/articles/(?P<doi>10\.\d{4,}/[^\s/?#]+)",
        ),
        PublisherPattern::new(
            "pnas",
            r"(?i)pnas\.org/doi/(?:abs/|full/|epdf/)?(?P<doi>10\.\d{4,}/[^\s?#]+)",
        ),
        PublisherPattern::new(
            "biorxiv",
            r"(?i)biorxiv\.org/content/(?P<doi>10\.\d{4,}/[\d.]+)",
        ),
    ]
}
