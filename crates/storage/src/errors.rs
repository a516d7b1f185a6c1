use thiserror::Error;

/// Failures of the slashing protection store. Every variant is fatal for the
/// duty that hit it; the store never retries internally.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("failed to begin transaction: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("failed to open table: {0}")]
    Table(#[from] redb::TableError),

    #[error("failed to read or write record: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("failed to commit transaction: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
}
