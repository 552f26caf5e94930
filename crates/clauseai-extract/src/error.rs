use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type {} (expected a .pdf)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("page {page}: {message}")]
    Content { page: u32, message: String },
}
