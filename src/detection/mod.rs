pub mod recognizer;
pub mod response;

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

pub use recognizer::{
    CelebrityRecognizer, RecognitionRequest, Recognizer, RekognitionRecognizer, ReplayRecognizer,
};
pub use response::RecognitionResponse;

use crate::error::{Error, Result};
use crate::models::DetectedFace;

/// Sends image files to a [`CelebrityRecognizer`] and validates the answer.
#[derive(Debug, Clone)]
pub struct CelebrityDetector<R> {
    recognizer: R,
}

impl<R: CelebrityRecognizer> CelebrityDetector<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Detect celebrity faces in the image at `image_path`.
    ///
    /// An empty result means nothing was detected. Entries the service
    /// returns without a usable bounding box or confidence are dropped.
    pub async fn detect(&self, image_path: &Path) -> Result<Vec<DetectedFace>> {
        let image_bytes = std::fs::read(image_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(image_path.to_path_buf()),
            _ => Error::Detection {
                image: image_path.to_path_buf(),
                source: Box::new(e),
            },
        })?;

        let response = self
            .recognizer
            .recognize_celebrities(RecognitionRequest {
                source: image_path,
                image_bytes,
            })
            .await
            .map_err(|source| Error::Detection {
                image: image_path.to_path_buf(),
                source,
            })?;

        Ok(validate_response(&response))
    }
}

/// Keep the well-formed entries of `response`, in service order.
pub fn validate_response(response: &RecognitionResponse) -> Vec<DetectedFace> {
    response
        .celebrity_faces
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| match raw.validate() {
            Ok(face) => {
                debug!(
                    "Face {}: {} ({:.2}%)",
                    i + 1,
                    face.name,
                    face.confidence
                );
                Some(face)
            }
            Err(reason) => {
                warn!("Ignoring malformed celebrity entry {}: {}", i + 1, reason);
                None
            }
        })
        .collect()
}
