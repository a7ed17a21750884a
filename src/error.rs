#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage: {0}")]
    Storage(#[from] rangedb_store::Error),

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("No more elements")]
    NoSuchElement,

    #[error("Invalid key range: {0}")]
    InvalidRange(String),
}

impl Error {
    /// Whether this error reports a caller bug rather than a store failure.
    pub fn is_usage(&self) -> bool {
        !matches!(self, Error::Storage(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
