use std::path::PathBuf;

use thiserror::Error;

use crate::paths::PathError;
use crate::rings::RingError;
use crate::smiles::SmilesError;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Analysis was requested before a molecule was set.
    #[error("no molecule set: call set_mol before analyze")]
    InvalidState,

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("SMILES parse failed: {0}")]
    Smiles(#[from] SmilesError),

    #[error("ring perception failed: {0}")]
    Rings(#[from] RingError),

    #[error("path enumeration failed: {0}")]
    Paths(#[from] PathError),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl BridgeError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        BridgeError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
