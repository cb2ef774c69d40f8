//! Typed errors for the fetch layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The API kept answering "accepted and will be processed" until the
    /// retry budget ran out.
    #[error("{url} still processing after {attempts} attempts")]
    StillProcessing { url: String, attempts: u32 },

    /// Every attempt failed at the transport or parse stage.
    #[error("{url} failed after {attempts} attempts: {reason}")]
    Exhausted {
        url: String,
        attempts: u32,
        reason: String,
    },

    /// The API refused the request outright; asking again will not help.
    #[error("{url} rejected: {reason}")]
    Rejected { url: String, reason: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
