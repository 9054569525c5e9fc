//! Integration tests for the detector and its recognition backends.

mod common;

use celebrity_annotator::detection::{ReplayRecognizer, validate_response};
use celebrity_annotator::detection::response::{CelebrityFace, RawBoundingBox};

use common::*;

#[tokio::test]
async fn test_detect_maps_service_response() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = create_test_image(&dir.path().join("photo.png"), 40, 30);

    let recognizer = ScriptedRecognizer::new(vec![Ok(response(vec![
        RecognizedCelebrity::new("Ada Lovelace", 97.5, [0.1, 0.2, 0.3, 0.4]),
        RecognizedCelebrity::new("Alan Turing", 60.0, [0.5, 0.5, 0.25, 0.25]),
    ]))]);
    let detector = CelebrityDetector::new(recognizer);

    let faces = detector.detect(&image).await?;

    assert_eq!(faces.len(), 2);
    assert_eq!(faces[0], make_face("Ada Lovelace", 97.5, [0.1, 0.2, 0.3, 0.4]));
    assert_eq!(faces[1].name, "Alan Turing");
    assert_eq!(detector.recognizer().seen(), vec![image]);
    Ok(())
}

#[tokio::test]
async fn test_empty_response_is_not_an_error() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = create_test_image(&dir.path().join("nobody.png"), 10, 10);
    let detector = CelebrityDetector::new(ScriptedRecognizer::new(vec![Ok(response(vec![]))]));

    let faces = detector.detect(&image).await?;
    assert!(faces.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_service_failure_is_detection_error() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = create_test_image(&dir.path().join("photo.png"), 10, 10);
    let detector = CelebrityDetector::new(ScriptedRecognizer::new(vec![Err(
        "ThrottlingException: rate exceeded".to_string(),
    )]));

    let err = detector.detect(&image).await.unwrap_err();

    assert!(matches!(err, Error::Detection { .. }), "got {:?}", err);
    assert!(err.to_string().contains("rate exceeded"));
    Ok(())
}

#[tokio::test]
async fn test_missing_image_is_not_found() {
    let detector = CelebrityDetector::new(ScriptedRecognizer::default());
    let err = detector
        .detect(std::path::Path::new("/definitely/not/here.jpg"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
    assert!(detector.recognizer().seen().is_empty());
}

#[test]
fn test_malformed_entries_are_dropped() {
    let no_box = RecognizedCelebrity {
        name: Some("Ghost".to_string()),
        match_confidence: Some(99.0),
        face: Some(CelebrityFace { bounding_box: None }),
    };
    let no_face = RecognizedCelebrity {
        name: Some("Nobody".to_string()),
        match_confidence: Some(99.0),
        face: None,
    };
    let partial_box = RecognizedCelebrity {
        face: Some(CelebrityFace {
            bounding_box: Some(RawBoundingBox {
                left: Some(0.1),
                top: Some(0.1),
                width: None,
                height: Some(0.2),
            }),
        }),
        ..RecognizedCelebrity::new("Half", 90.0, [0.0; 4])
    };
    let nan_box = RecognizedCelebrity::new("NaN", 90.0, [f32::NAN, 0.1, 0.1, 0.1]);
    let bad_confidence = RecognizedCelebrity::new("Sure", 140.0, [0.1, 0.1, 0.1, 0.1]);
    let negative_width = RecognizedCelebrity::new("Inside Out", 90.0, [0.5, 0.1, -0.1, 0.1]);
    let valid = RecognizedCelebrity::new("Real", 88.0, [0.1, 0.1, 0.1, 0.1]);

    let faces = validate_response(&response(vec![
        no_box,
        no_face,
        partial_box,
        nan_box,
        bad_confidence,
        negative_width,
        valid,
    ]));

    assert_eq!(faces.len(), 1);
    assert_eq!(faces[0].name, "Real");
}

#[test]
fn test_face_cut_by_the_frame_edge_is_kept() {
    let edge = RecognizedCelebrity::new("Edge", 99.0, [-0.02, 0.1, 0.2, 0.3]);
    let past_bottom = RecognizedCelebrity::new("Low", 95.0, [0.4, 0.9, 0.2, 0.3]);

    let faces = validate_response(&response(vec![edge, past_bottom]));

    assert_eq!(faces.len(), 2);
    assert_eq!(faces[0].name, "Edge");
    assert_eq!(faces[0].bounding_box.left, -0.02);
    let bbox = faces[0].bounding_box.to_pixels(1000, 800);
    assert_eq!(bbox.left, 0);
    assert_eq!(bbox.top, 80);
    assert_eq!(faces[1].bounding_box.to_pixels(1000, 800).bottom, 800);
}

#[test]
fn test_missing_name_and_confidence_get_defaults() {
    let unnamed = RecognizedCelebrity {
        name: None,
        match_confidence: None,
        ..RecognizedCelebrity::new("", 0.0, [0.2, 0.2, 0.1, 0.1])
    };
    let blank = RecognizedCelebrity::new("   ", 91.0, [0.2, 0.2, 0.1, 0.1]);

    let faces = validate_response(&response(vec![unnamed, blank]));

    assert_eq!(faces.len(), 2);
    assert_eq!(faces[0].name, "Unknown");
    assert_eq!(faces[0].confidence, 0.0);
    assert_eq!(faces[1].name, "Unknown");
    assert_eq!(faces[1].confidence, 91.0);
}

#[tokio::test]
async fn test_replay_reads_saved_rekognition_json() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = create_test_image(&dir.path().join("ptv.png"), 10, 10);
    let saved = r#"{
        "CelebrityFaces": [
            {
                "Urls": ["www.wikidata.org/wiki/Q7259"],
                "Name": "Ada Lovelace",
                "Id": "1a2b3c",
                "Face": {
                    "BoundingBox": {"Width": 0.2, "Height": 0.3, "Left": 0.1, "Top": 0.1},
                    "Confidence": 99.9
                },
                "MatchConfidence": 96.0,
                "KnownGender": {"Type": "Female"}
            }
        ],
        "UnrecognizedFaces": []
    }"#;
    std::fs::write(dir.path().join("ptv.json"), saved)?;

    let detector = CelebrityDetector::new(ReplayRecognizer::new(dir.path()));
    let faces = detector.detect(&image).await?;

    assert_eq!(faces, vec![make_face("Ada Lovelace", 96.0, [0.1, 0.1, 0.2, 0.3])]);
    Ok(())
}

#[tokio::test]
async fn test_replay_without_saved_response_fails() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = create_test_image(&dir.path().join("unsaved.png"), 10, 10);

    let detector = CelebrityDetector::new(ReplayRecognizer::new(dir.path()));
    let err = detector.detect(&image).await.unwrap_err();

    assert!(matches!(err, Error::Detection { .. }), "got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn test_replayed_box_lands_on_exact_pixels() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let image = create_test_image(&dir.path().join("row.png"), 10, 10);
    let saved = r#"{
        "CelebrityFaces": [
            {
                "Name": "Grace Hopper",
                "Face": {"BoundingBox": {"Width": 0.25, "Height": 0.25, "Left": 0.7, "Top": 0.7}},
                "MatchConfidence": 99.0
            },
            {
                "Name": "Edge",
                "Face": {"BoundingBox": {"Width": 0.2, "Height": 0.3, "Left": -0.02, "Top": 0.1}},
                "MatchConfidence": 98.0
            }
        ]
    }"#;
    std::fs::write(dir.path().join("row.json"), saved)?;

    let detector = CelebrityDetector::new(ReplayRecognizer::new(dir.path()));
    let faces = detector.detect(&image).await?;

    assert_eq!(faces.len(), 2);
    let hopper = faces[0].bounding_box.to_pixels(1000, 800);
    assert_eq!((hopper.left, hopper.top), (700, 560));
    let edge = faces[1].bounding_box.to_pixels(1000, 800);
    assert_eq!((edge.left, edge.top), (0, 80));
    Ok(())
}
