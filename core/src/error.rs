//! Error types for the check bundle client.
//!
//! # Design
//! Bad addressing is caught before any request is built and gets its own
//! variant. Transport failures keep the method and path they happened on.
//! There is no dedicated not-found case: a 404 is a
//! [`TransportError::Status`] like any other non-2xx reply.

use thiserror::Error;

use crate::http::HttpMethod;

/// Failures reported by a [`Transport`](crate::http::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced an HTTP response.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Errors returned by check bundle operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The identifier is not of the form `/check_bundle/<digits>`.
    #[error("invalid check bundle CID {0:?}")]
    InvalidCid(String),

    #[error("API call error: {method} {path}: {source}")]
    Transport {
        method: HttpMethod,
        path: String,
        #[source]
        source: TransportError,
    },

    /// The response body could not be decoded into the expected type.
    #[error("decoding response failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The record could not be encoded as a request body.
    #[error("encoding request failed: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the failed call, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport {
                source: TransportError::Status { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
