use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by recognition backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("celebrity detection failed for {}: {source}", .image.display())]
    Detection {
        image: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("image I/O failed for {}: {source}", .path.display())]
    ImageIo {
        path: PathBuf,
        #[source]
        source: ImageIoSource,
    },

    #[error("failed to load font {}: {reason}", .path.display())]
    FontLoad { path: PathBuf, reason: String },
}

/// Underlying cause of an [`Error::ImageIo`].
#[derive(Debug, Error)]
pub enum ImageIoSource {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn image_io(path: impl Into<PathBuf>, source: impl Into<ImageIoSource>) -> Self {
        Error::ImageIo {
            path: path.into(),
            source: source.into(),
        }
    }
}
