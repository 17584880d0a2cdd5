//! Storage failures.

use thiserror::Error;

/// Shorthand used by every store operation.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Why a store call failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists under the given key.
    #[error("record not found")]
    NotFound,

    /// `RocksDB` rejected the read or write.
    #[error("rocksdb: {0}")]
    Database(#[from] rocksdb::Error),

    /// The database was opened without a column family we rely on.
    #[error("missing column family {0}")]
    MissingColumnFamily(String),

    /// A record could not be encoded to or decoded from CBOR.
    #[error("cbor: {0}")]
    Codec(String),

    /// An index entry could not be decoded.
    #[error("corrupt index key in {0}")]
    CorruptKey(&'static str),
}
