//! Error types for the departure resolution pipeline.

/// Errors raised while building queries, talking to the transit service or
/// resolving a user's choices.
///
/// None of these are retried: every variant aborts the current run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter constraint was neither a string nor a list of strings.
    #[error("filter `{name}` must be a string or a list of strings, got {found}")]
    InvalidParameterType { name: String, found: String },

    /// Route categories were given as something other than a name or list of names.
    #[error("route types must be a list of strings or a string, got {0}")]
    InvalidArgument(String),

    /// Category name not in the fixed route-type lookup.
    #[error("unknown route category: {0}")]
    UnknownRouteCategory(String),

    /// The transit service rejected the request.
    #[error("remote query failed with status {status}: {message}")]
    RemoteQuery { status: u16, message: String },

    /// The user's choice does not match any presented option.
    #[error("{choice} is not in the list of available {label}s")]
    SelectionNotFound { choice: String, label: String },

    /// The configured API root cannot be used as a base URL.
    #[error("invalid API root `{url}`: {message}")]
    InvalidApiRoot { url: String, message: String },

    /// HTTP request failed (network error, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not a document we understand
    #[error("JSON parse error: {message}")]
    Decode { message: String },

    /// Console read or write failed
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
