use std::path::{Path, PathBuf};

use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Celebrity, Image};
use tracing::debug;

use crate::detection::response::{
    CelebrityFace, RawBoundingBox, RecognitionResponse, RecognizedCelebrity,
};
use crate::error::BoxError;

/// One image sent for recognition.
#[derive(Debug, Clone)]
pub struct RecognitionRequest<'a> {
    /// Where the bytes were read from. Backends that only need the bytes
    /// may ignore it.
    pub source: &'a Path,
    pub image_bytes: Vec<u8>,
}

/// Remote celebrity recognition, one request per image.
pub trait CelebrityRecognizer {
    fn recognize_celebrities(
        &self,
        request: RecognitionRequest<'_>,
    ) -> impl Future<Output = Result<RecognitionResponse, BoxError>>;
}

/// AWS Rekognition `RecognizeCelebrities`.
#[derive(Debug, Clone)]
pub struct RekognitionRecognizer {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionRecognizer {
    pub fn new(client: aws_sdk_rekognition::Client) -> Self {
        Self { client }
    }

    /// Build a client from the standard AWS credential and region chain.
    /// `region` overrides whatever the environment configures.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_sdk_rekognition::config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(aws_sdk_rekognition::Client::new(&config))
    }
}

impl CelebrityRecognizer for RekognitionRecognizer {
    async fn recognize_celebrities(
        &self,
        request: RecognitionRequest<'_>,
    ) -> Result<RecognitionResponse, BoxError> {
        debug!(
            "Sending {} bytes from {} to Rekognition",
            request.image_bytes.len(),
            request.source.display()
        );
        let output = self
            .client
            .recognize_celebrities()
            .image(Image::builder().bytes(Blob::new(request.image_bytes)).build())
            .send()
            .await
            .map_err(|e| DisplayErrorContext(e).to_string())?;

        Ok(RecognitionResponse {
            celebrity_faces: output.celebrity_faces().iter().map(from_sdk).collect(),
        })
    }
}

fn from_sdk(celebrity: &Celebrity) -> RecognizedCelebrity {
    let bounding_box = celebrity
        .face()
        .and_then(|face| face.bounding_box())
        .map(|b| RawBoundingBox {
            left: b.left(),
            top: b.top(),
            width: b.width(),
            height: b.height(),
        });

    RecognizedCelebrity {
        name: celebrity.name().map(str::to_string),
        match_confidence: celebrity.match_confidence(),
        face: celebrity.face().map(|_| CelebrityFace { bounding_box }),
    }
}

/// Answers from saved `RecognizeCelebrities` JSON responses, one
/// `<image stem>.json` file per image in `dir`.
#[derive(Debug, Clone)]
pub struct ReplayRecognizer {
    dir: PathBuf,
}

impl ReplayRecognizer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn response_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!("{}.json", stem))
    }
}

impl CelebrityRecognizer for ReplayRecognizer {
    async fn recognize_celebrities(
        &self,
        request: RecognitionRequest<'_>,
    ) -> Result<RecognitionResponse, BoxError> {
        let path = self.response_path(request.source);
        debug!("Replaying response from {}", path.display());
        let text = std::fs::read_to_string(&path)
            .map_err(|e| format!("cannot read saved response {}: {}", path.display(), e))?;
        let response = serde_json::from_str(&text)
            .map_err(|e| format!("invalid saved response {}: {}", path.display(), e))?;
        Ok(response)
    }
}

/// Either backend, chosen at start-up.
#[derive(Debug, Clone)]
pub enum Recognizer {
    Rekognition(RekognitionRecognizer),
    Replay(ReplayRecognizer),
}

impl CelebrityRecognizer for Recognizer {
    async fn recognize_celebrities(
        &self,
        request: RecognitionRequest<'_>,
    ) -> Result<RecognitionResponse, BoxError> {
        match self {
            Recognizer::Rekognition(r) => r.recognize_celebrities(request).await,
            Recognizer::Replay(r) => r.recognize_celebrities(request).await,
        }
    }
}
