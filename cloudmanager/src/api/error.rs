use thiserror::Error;

use super::response::ResponseError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("GCP requests require an access token")]
    MissingGcpToken,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unknown host type: {0}")]
    UnknownHostType(String),

    #[error("Failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("No result returned (HTTP {status})")]
    NoResult { status: u16 },

    #[error("API returned error (HTTP {status}, request id {request_id:?}): {error}")]
    Api {
        status: u16,
        request_id: String,
        #[source]
        error: ResponseError,
    },

    #[error("API returned HTTP {status} (request id {request_id:?}): {body}")]
    Status {
        status: u16,
        request_id: String,
        body: String,
    },

    #[error("Failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("No credentials configured: set a refresh token or service account")]
    MissingCredentials,

    #[error("{action} {task} failed: {message}")]
    TaskFailed {
        action: String,
        task: String,
        message: String,
    },

    #[error("Timed out waiting for {action} {task} after {retries} polls")]
    TaskTimeout {
        action: String,
        task: String,
        retries: u32,
    },
}
