use std::path::PathBuf;

use tracing::{error, info};

use crate::annotation::{AnnotationSummary, Annotator};
use crate::detection::{CelebrityDetector, CelebrityRecognizer};
use crate::error::Result;
use crate::paths::{DEFAULT_ASSETS_FOLDER, PathResolver};

/// Result of processing one image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Annotated {
        output: PathBuf,
        summary: AnnotationSummary,
    },
    NoDetections,
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    pub image: String,
    pub outcome: ImageOutcome,
}

/// Outcomes of a run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub images: Vec<ImageReport>,
}

impl RunReport {
    pub fn annotated(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Annotated { .. }))
    }

    pub fn without_detections(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::NoDetections))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ImageOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ImageOutcome) -> bool) -> usize {
        self.images.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Resolve → detect → annotate, one image at a time.
pub struct Pipeline<R> {
    resolver: PathResolver,
    detector: CelebrityDetector<R>,
    annotator: Annotator,
    assets_folder: String,
}

impl<R: CelebrityRecognizer> Pipeline<R> {
    pub fn new(
        resolver: PathResolver,
        detector: CelebrityDetector<R>,
        annotator: Annotator,
    ) -> Self {
        Self {
            resolver,
            detector,
            annotator,
            assets_folder: DEFAULT_ASSETS_FOLDER.to_string(),
        }
    }

    /// Folder, relative to the resolver root, holding input and output images.
    pub fn with_assets_folder(mut self, folder: impl Into<String>) -> Self {
        self.assets_folder = folder.into();
        self
    }

    /// Process every image in order. A failure is recorded for that image and
    /// the run moves on to the next one.
    pub async fn run<S: AsRef<str>>(&self, images: &[S]) -> RunReport {
        let mut report = RunReport::default();

        for image in images {
            let image = image.as_ref();
            let outcome = match self.process(image).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Error processing {}: {}", image, e);
                    ImageOutcome::Failed { error: e.to_string() }
                }
            };
            report.images.push(ImageReport {
                image: image.to_string(),
                outcome,
            });
        }

        report
    }

    async fn process(&self, image: &str) -> Result<ImageOutcome> {
        let source = self.resolver.resolve(image, &self.assets_folder)?;
        let output = self.resolver.annotated_output(image, &self.assets_folder)?;

        let faces = self.detector.detect(&source).await?;
        if faces.is_empty() {
            info!("No celebrities detected in: {}", image);
            return Ok(ImageOutcome::NoDetections);
        }

        let noun = if faces.len() == 1 { "celebrity" } else { "celebrities" };
        info!("{} {} recognized in {}", faces.len(), noun, image);
        let summary = self.annotator.annotate(&source, &output, &faces)?;
        Ok(ImageOutcome::Annotated { output, summary })
    }
}
