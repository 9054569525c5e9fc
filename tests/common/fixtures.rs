use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use celebrity_annotator::detection::RecognitionResponse;
use celebrity_annotator::detection::response::RecognizedCelebrity;
use celebrity_annotator::error::BoxError;
use celebrity_annotator::{
    CelebrityRecognizer, DetectedFace, NormalizedBox, PathResolver, RecognitionRequest,
};
use image::{Rgb, RgbImage};

/// Background of generated test images.
pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// Writes a solid gray image of the given size. The format follows the extension.
pub fn create_test_image(path: &Path, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_pixel(width, height, GRAY);
    img.save(path).expect("Failed to save test image");
    path.to_path_buf()
}

/// Creates a temp root with an `assets` folder and a resolver pointing at it.
/// Keep the TempDir alive for the duration of the test.
pub fn create_assets() -> (tempfile::TempDir, PathResolver) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    std::fs::create_dir(dir.path().join("assets")).expect("Failed to create assets folder");
    let resolver = PathResolver::new(dir.path()).expect("Failed to create resolver");
    (dir, resolver)
}

pub fn make_face(name: &str, confidence: f32, bbox: [f32; 4]) -> DetectedFace {
    let [left, top, width, height] = bbox;
    DetectedFace {
        bounding_box: NormalizedBox { left, top, width, height },
        name: name.to_string(),
        confidence,
    }
}

pub fn response(faces: Vec<RecognizedCelebrity>) -> RecognitionResponse {
    RecognitionResponse { celebrity_faces: faces }
}

/// Recognizer double answering from a script, one entry per call.
#[derive(Default)]
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Result<RecognitionResponse, String>>>,
    seen: Mutex<Vec<PathBuf>>,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<Result<RecognitionResponse, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Sources of all requests received so far.
    pub fn seen(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

impl CelebrityRecognizer for ScriptedRecognizer {
    async fn recognize_celebrities(
        &self,
        request: RecognitionRequest<'_>,
    ) -> Result<RecognitionResponse, BoxError> {
        assert!(!request.image_bytes.is_empty(), "recognizer received no image bytes");
        self.seen.lock().unwrap().push(request.source.to_path_buf());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(message.into()),
            None => Err("unexpected recognition call".into()),
        }
    }
}
