use std::fmt;

/// Failure talking to the admin REST backend.
#[derive(Debug)]
pub enum ApiError {
    /// Connection refused, timeout, TLS, ...
    Transport(reqwest::Error),
    /// Non-2xx response.
    Status(u16),
    /// 2xx with `success: false`.
    Unsuccessful(String),
    /// Body was not the expected JSON shape.
    Malformed(String),
    /// No bearer token in the session store; no request was sent.
    MissingCredential,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(e) => write!(f, "Network error: {e}"),
            ApiError::Status(code) => write!(f, "Request failed with status {code}"),
            ApiError::Unsuccessful(msg) => write!(f, "Request rejected: {msg}"),
            ApiError::Malformed(e) => write!(f, "Unexpected response: {e}"),
            ApiError::MissingCredential => write!(f, "Not signed in"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Log at the level the failure deserves and hand it back.
    pub fn logged(self, context: &str) -> Self {
        match &self {
            ApiError::Transport(_) | ApiError::Malformed(_) => log::error!("{context}: {self}"),
            _ => log::warn!("{context}: {self}"),
        }
        self
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Malformed(e.to_string())
    }
}

/// Failure reading or writing the persisted session.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Storage error: {e}"),
            StorageError::Json(e) => write!(f, "Storage JSON error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Json(e)
    }
}
