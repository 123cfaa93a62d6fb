//! The resolution pipeline: dispatch, fallback, assembly

mod dispatcher;
mod fallback;
mod pipeline;

pub use dispatcher::SourceDispatcher;
pub use fallback::{select_candidate, FallbackConfig, FallbackResolver};
pub use pipeline::{Resolver, ResolverConfig};

use thiserror::Error;

use crate::cache::{RequestKey, ResponseCache};
use crate::error::{CacheError, HttpError};
use crate::http::{HttpClient, Throttle};

/// Failure of a single cached fetch, before it is attributed to an
/// identifier or a search.
#[derive(Error, Debug)]
pub(crate) enum FetchError {
    #[error("{0}")]
    Http(#[from] HttpError),
    #[error("{0}")]
    Cache(#[from] CacheError),
}

/// Cache-disciplined GET shared by the dispatcher and the fallback
/// resolver: serve a hit without touching the network or the throttle;
/// on a miss, fetch and durably store the raw body before returning it
/// for parsing.
pub(crate) async fn cached_get(
    http: &HttpClient,
    cache: &dyn ResponseCache,
    throttle: &Throttle,
    key: &RequestKey,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<String, FetchError> {
    if let Some(body) = cache.get(key)? {
        tracing::debug!(key = %key.canonical(), "cache hit");
        return Ok(body);
    }

    let response = http.get(url, headers, throttle).await?;
    cache.put(key, &response.body)?;
    Ok(response.body)
}
