use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("stored state is corrupted: {0}")]
    Corruption(String),

    #[error("stored schema version {found} does not match expected {expected}")]
    SchemaMismatch { expected: u32, found: u32 },
}
