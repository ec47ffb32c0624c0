//! Extraction service boundary: the `Extractor` seam and its HTTP implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use priorauth_core::ExtractionResult;
use thiserror::Error;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{DEFAULT_API_URL, ExtractClient};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upload failed ({status})")]
    Server { status: u16, body: String },
    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Anything that can turn a packet on disk into an [`ExtractionResult`].
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<ExtractionResult, ExtractError>;
}

/// Read the packet bytes for upload.
pub async fn read_packet(path: &Path) -> Result<Vec<u8>, ExtractError> {
    tokio::fs::read(path).await.map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}
