use thiserror::Error;

/// Errors surfaced by the recap pipeline.
///
/// Every variant carries owned text rather than the source error so the
/// value can be cloned to all callers waiting on one in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecapError {
    #[error("Cache store is not configured")]
    NotConfigured,

    #[error("Rate limited by upstream after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream rejected request ({status}): {message}")]
    UpstreamClient { status: u16, message: String },

    #[error("Upstream server error ({status}): {message}")]
    UpstreamServer { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecapError {
    /// HTTP-style status for callers that expose results over a web boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            RecapError::NotFound(_) => 404,
            RecapError::RateLimited { .. } => 429,
            RecapError::Network(_)
            | RecapError::UpstreamClient { .. }
            | RecapError::UpstreamServer { .. } => 502,
            _ => 500,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            RecapError::NotFound(_) => 2,
            RecapError::RateLimited { .. } => 3,
            RecapError::Network(_)
            | RecapError::UpstreamClient { .. }
            | RecapError::UpstreamServer { .. } => 4,
            _ => 1,
        }
    }

    /// Whether retrying later has a reasonable chance of succeeding.
    pub fn is_retriable_later(&self) -> bool {
        matches!(self, RecapError::RateLimited { .. } | RecapError::Network(_))
    }
}

impl From<reqwest::Error> for RecapError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RecapError::Decode(e.to_string())
        } else {
            RecapError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for RecapError {
    fn from(e: serde_json::Error) -> Self {
        RecapError::Decode(e.to_string())
    }
}

impl From<tokio_rusqlite::Error> for RecapError {
    fn from(e: tokio_rusqlite::Error) -> Self {
        RecapError::Cache(e.to_string())
    }
}

impl From<rusqlite::Error> for RecapError {
    fn from(e: rusqlite::Error) -> Self {
        RecapError::Cache(e.to_string())
    }
}

impl From<std::io::Error> for RecapError {
    fn from(e: std::io::Error) -> Self {
        RecapError::Io(e.to_string())
    }
}

impl From<toml::de::Error> for RecapError {
    fn from(e: toml::de::Error) -> Self {
        RecapError::Config(e.to_string())
    }
}
