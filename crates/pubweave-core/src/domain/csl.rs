//! CSL-JSON citation metadata
//!
//! A style-agnostic subset of the Citation Style Language data model, as
//! returned by the NCBI literature citation exporter and by DOI content
//! negotiation. Unknown fields are ignored on deserialize; the cache keeps
//! the raw body, so nothing is lost by the subset.

use serde::{Deserialize, Serialize};

/// A contributor name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// Institutional or otherwise unstructured name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl CslName {
    /// "Family, Given" display form, falling back to whichever part exists.
    pub fn display(&self) -> String {
        match (&self.family, &self.given) {
            (Some(f), Some(g)) => format!("{}, {}", f, g),
            (Some(f), None) => f.clone(),
            (None, Some(g)) => g.clone(),
            (None, None) => self.literal.clone().unwrap_or_default(),
        }
    }
}

/// A CSL date, carried as nested date-parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslDate {
    #[serde(
        rename = "date-parts",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_parts: Option<Vec<Vec<i32>>>,
}

impl CslDate {
    pub fn year(&self) -> Option<i32> {
        self.date_parts
            .as_ref()
            .and_then(|dp| dp.first())
            .and_then(|parts| parts.first().copied())
    }
}

/// A structured citation record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CslItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<CslName>,

    #[serde(
        rename = "container-title",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub container_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<CslDate>,

    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(rename = "PMID", default, skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,

    #[serde(rename = "PMCID", default, skip_serializing_if = "Option::is_none")]
    pub pmcid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
}

impl CslItem {
    pub fn year(&self) -> Option<i32> {
        self.issued.as_ref().and_then(|d| d.year())
    }
}
