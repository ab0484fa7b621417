use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("ledger error: {0}")]
    Ledger(#[from] linen_ledger::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] linen_store::StoreError),

    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

impl SdkError {
    /// Returns `true` for rejected user input (bad amount, movement or name).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Ledger(e) if e.is_validation())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
