//! Search indexing and querying for published documentation.
//!
//! Three pieces: [`document`] turns a build's per-page JSON fragments into
//! flat [`SearchDocument`]s, [`client`] bulk-loads them into an
//! Elasticsearch-compatible index and runs the boosted query the site's
//! search box issues, and [`snippet`] extracts the highlighted context
//! shown under each hit.

pub mod client;
pub mod document;
pub mod snippet;

mod html;

pub use client::{SearchClient, SearchHit};
pub use document::{DocumentIter, SearchDocument, build_documents};
pub use snippet::find_relevant_text;

/// Error from search indexing or querying.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// The search engine returned an error status.
    #[error("search engine error: {status} - {body}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// I/O error while reading fragments.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fragment could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
