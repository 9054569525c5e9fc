//! Recognition responses as the service returns them, before validation.
//!
//! Field names follow the Rekognition `RecognizeCelebrities` JSON shape so a
//! saved response can be deserialized directly.

use serde::Deserialize;

use crate::models::{DetectedFace, NormalizedBox, UNKNOWN_NAME};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecognitionResponse {
    #[serde(default)]
    pub celebrity_faces: Vec<RecognizedCelebrity>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecognizedCelebrity {
    pub name: Option<String>,
    pub match_confidence: Option<f32>,
    pub face: Option<CelebrityFace>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CelebrityFace {
    pub bounding_box: Option<RawBoundingBox>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawBoundingBox {
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl RecognizedCelebrity {
    /// Convenience constructor for a fully populated entry.
    pub fn new(name: &str, confidence: f32, bbox: [f32; 4]) -> Self {
        let [left, top, width, height] = bbox;
        Self {
            name: Some(name.to_string()),
            match_confidence: Some(confidence),
            face: Some(CelebrityFace {
                bounding_box: Some(RawBoundingBox {
                    left: Some(left),
                    top: Some(top),
                    width: Some(width),
                    height: Some(height),
                }),
            }),
        }
    }

    /// Validate into a [`DetectedFace`].
    ///
    /// A missing name becomes [`UNKNOWN_NAME`] and a missing confidence
    /// becomes 0. A missing or non-finite bounding box, a negative box size,
    /// or a confidence outside `[0, 100]` rejects the entry.
    ///
    /// Edges past the frame (a face cut by the image border) are kept and
    /// clamped when converted to pixels.
    pub fn validate(&self) -> Result<DetectedFace, String> {
        let raw = self
            .face
            .as_ref()
            .and_then(|f| f.bounding_box.as_ref())
            .ok_or("missing bounding box")?;

        let edge = |value: Option<f32>, label: &str| -> Result<f32, String> {
            match value {
                Some(v) if v.is_finite() => Ok(v),
                Some(v) => Err(format!("bounding box {} is not finite: {}", label, v)),
                None => Err(format!("bounding box {} missing", label)),
            }
        };
        let extent = |value: Option<f32>, label: &str| -> Result<f32, String> {
            match edge(value, label)? {
                v if v < 0.0 => Err(format!("bounding box {} is negative: {}", label, v)),
                v => Ok(v),
            }
        };
        let bounding_box = NormalizedBox {
            left: edge(raw.left, "left")?,
            top: edge(raw.top, "top")?,
            width: extent(raw.width, "width")?,
            height: extent(raw.height, "height")?,
        };

        let confidence = self.match_confidence.unwrap_or(0.0);
        if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
            return Err(format!("confidence out of range: {}", confidence));
        }

        let name = match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => UNKNOWN_NAME.to_string(),
        };

        Ok(DetectedFace {
            bounding_box,
            name,
            confidence,
        })
    }
}
