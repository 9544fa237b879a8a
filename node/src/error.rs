use accrue_types::Timestamp;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] accrue_ledger::LedgerError),

    #[error("escrow error: {0}")]
    Escrow(#[from] accrue_oracle::EscrowError),

    #[error("snapshot storage error: {0}")]
    Storage(#[from] accrue_store_lmdb::LmdbError),

    #[error("snapshot store error: {0}")]
    Store(#[from] accrue_store::StoreError),

    #[error("snapshot encoding error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("command log line {line}: {reason}")]
    CommandLog { line: usize, reason: String },

    #[error("command at {at} is older than the last applied command at {last}")]
    OutOfOrder { at: Timestamp, last: Timestamp },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<bincode::Error> for NodeError {
    fn from(err: bincode::Error) -> Self {
        NodeError::Serialization(err.to_string())
    }
}
