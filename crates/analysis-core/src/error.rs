use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors surfaced by external data providers.
///
/// Concrete transport/decoding errors are mapped into these variants at the
/// provider boundary so nothing provider-specific leaks into scoring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The provider answered but has nothing for this symbol/period.
    #[error("no data for {0}")]
    NoData(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Transient failures are worth retrying later; `NoData` and parse errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited(_) | ProviderError::Transport(_) | ProviderError::Status { .. }
        )
    }
}
