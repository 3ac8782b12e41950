//!
//! Container error types.
//!
//! Signature, size and open failures are raised only while an executable is
//! being constructed. Once construction succeeds the header is valid for the
//! lifetime of the value; later failures can only come from the byte source.
//!

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvmFileError {
    #[error("Executable not found at {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid signature {found:?}, expected \"ESET-VM2\"")]
    InvalidSignature { found: String },

    #[error("Invalid size: header declares {expected} bytes, source has {actual}")]
    InvalidSize { expected: u64, actual: u64 },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
