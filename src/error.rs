use thiserror::Error;

/// Errors raised by an idea store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("idea {0} not found")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("idea service returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} is not supported by the {backend} store")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn network(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }

    pub fn unsupported(backend: &'static str, operation: &'static str) -> Self {
        StoreError::Unsupported { backend, operation }
    }
}
