use crate::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A request is already in flight for this session.
    #[error("session is busy with a previous request")]
    Busy,

    /// The model kept requesting tools past the configured cap.
    #[error("too many tool rounds (limit {limit})")]
    TooManyToolRounds { limit: usize },

    /// The model invocation itself failed; fatal to the current request.
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, Error>;
