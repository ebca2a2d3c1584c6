use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while converting annotations or building the dataset.
#[derive(Debug, Error)]
pub enum Error {
    /// A shape that falls back to the polygon path has no points.
    #[error("shape '{label}' has no points, bounding box is undefined")]
    MalformedShape { label: String },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidImageDimensions { width: f64, height: f64 },

    /// Partitioning was asked to split zero items.
    #[error("nothing to partition: no items given")]
    EmptyDataset,

    /// The source directory holds no image with a matching annotation.
    #[error("no labeled images found in {}", dir.display())]
    NoLabeledImages { dir: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON ({}): {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read image ({}): {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
