//! Common types for service adapters

use thiserror::Error;

/// Failures local to a service adapter
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Static description of a remote service
pub struct SourceMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_url: &'static str,
    pub rate_limit_per_second: f32,
}
