use std::path::PathBuf;

/// Why an asset could not be loaded.
///
/// Callers log it and carry on; a failed asset simply never becomes ready.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadFailure {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("glTF JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed asset: {0}")]
    Format(String),
    #[error("unsupported asset feature: {0}")]
    Unsupported(String),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
}

impl AssetLoadFailure {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}
