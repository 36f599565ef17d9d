//! Error types for upstream requests and decoding.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures that can occur while talking to the MLB Stats API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build upstream client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent or timed out in flight.
    #[error("failed to request `{url}`")]
    RequestSend {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The upstream returned a non-success status code.
    #[error("unexpected upstream response status {status} for `{url}`")]
    RequestStatus { url: String, status: StatusCode },
    /// Response payload could not be parsed into the expected shape.
    #[error("failed to decode upstream response for `{url}`")]
    DecodeResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The schedule endpoint returned no dates for the requested day.
    #[error("schedule returned no games for date {date}")]
    EmptySchedule { date: String },
    /// The caller's cancellation token fired mid-request.
    #[error("upstream request cancelled")]
    Cancelled,
}
