//! API utilities for frontend-backend communication
//!
//! Provides URL construction with query strings and a single JSON GET helper
//! shared by the dashboard API modules.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Failure of a single read from the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("HTTP error: {0}")]
    Http(u16),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    /// The endpoint answered but reported `success: false`
    #[error("Server reported an unsuccessful response")]
    Rejected,
}

/// Build an API URL from a path and a serializable query
///
/// Absent query fields are skipped; an empty query yields the bare path.
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/d404/filtered-data", &query);
/// ```
pub fn api_url<Q: Serialize>(path: &str, query: &Q) -> String {
    match serde_qs::to_string(query) {
        Ok(qs) if !qs.is_empty() => format!("{}?{}", path, qs),
        Ok(_) => path.to_string(),
        Err(e) => {
            log::warn!("Failed to encode query for {}: {}", path, e);
            path.to_string()
        }
    }
}

/// GET `url` and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Http(response.status()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}
