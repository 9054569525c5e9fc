mod fixtures;
pub use fixtures::*;

// Re-export commonly used types for tests
pub use celebrity_annotator::detection::response::RecognizedCelebrity;
pub use celebrity_annotator::{
    AnnotationConfig, Annotator, CelebrityDetector, Color, DetectedFace, Error, ImageOutcome,
    LabelFont, PathResolver, Pipeline, PixelBox,
};
