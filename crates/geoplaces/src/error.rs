use thiserror::Error;

/// Errors returned by the places API client.
///
/// None of these are retried internally; callers decide what is worth a
/// second attempt (notably the `INVALID_REQUEST` a continuation token yields
/// when used before its activation window has elapsed).
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// timeouts and non-2xx statuses.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned `"status": "OVER_QUERY_LIMIT"`.
    #[error("over query limit: {0}")]
    OverQueryLimit(String),

    /// The API returned `"status": "REQUEST_DENIED"`.
    #[error("request denied: {0}")]
    RequestDenied(String),

    /// The API returned `"status": "INVALID_REQUEST"`.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other non-success status, including ones the server starts
    /// returning after this client was written.
    #[error("API error ({status}): {message}")]
    Unknown { status: String, message: String },

    /// The envelope or a result record is missing something the mapping
    /// requires (e.g. `results` on an `OK` envelope, or `geometry/location`).
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A caller-supplied argument failed eager validation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required environment variable is missing.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable holds an unparseable value.
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
