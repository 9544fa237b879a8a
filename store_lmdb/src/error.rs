use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored key is malformed: {0}")]
    BadKey(String),
}

impl From<LmdbError> for accrue_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::BadKey(reason) => accrue_store::StoreError::Corruption(reason),
            other => accrue_store::StoreError::Backend(other.to_string()),
        }
    }
}
