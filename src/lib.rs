pub mod annotation;
pub mod detection;
pub mod error;
pub mod models;
pub mod paths;
pub mod pipeline;

pub use annotation::{AnnotationConfig, AnnotationSummary, Annotator, LabelFont};
pub use detection::{CelebrityDetector, CelebrityRecognizer, RecognitionRequest, Recognizer};
pub use error::{Error, Result};
pub use models::{Color, DetectedFace, NormalizedBox, PixelBox};
pub use paths::PathResolver;
pub use pipeline::{ImageOutcome, ImageReport, Pipeline, RunReport};
