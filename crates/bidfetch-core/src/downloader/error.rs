//! Per-item download errors.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Response was fine but is not a PDF; nothing was written.
    #[error("Content-Type is not PDF but {0}")]
    NotPdf(String),
    /// Creating or writing the output file failed.
    #[error("storage: {0}")]
    Storage(#[from] io::Error),
}
