use thiserror::Error;

/// Errors from hosted-model calls.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("network: {0}")]
    Network(String),
    #[error("provider api: {0}")]
    Api(String),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("timeout after {0}ms")]
    Timeout(u64),
}
