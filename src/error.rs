//! Error types for talking to the transform service.
//!
//! Every variant is the same condition as far as the session is concerned: the
//! transfer failed. The variants exist so the log says *why*; the user only
//! ever sees [`USER_ERROR_MESSAGE`].

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// The one message shown to the user when an operation fails.
pub const USER_ERROR_MESSAGE: &str =
    "Could not process the file. Check that the transform service is running and reachable.";

#[derive(Debug, Error)]
pub enum TransferError {
    /// The request never produced a response (DNS, refused connection, reset).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("service answered {status} for {url}")]
    Status { url: String, status: StatusCode },

    /// The response body could not be read as a byte stream.
    #[error("could not read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The caller-side deadline expired before the request settled.
    #[error("no response within {0:?}")]
    DeadlineExceeded(Duration),

    /// The submission task ended without producing a result (panic or abort).
    #[error("submission task aborted: {0}")]
    Aborted(String),
}
