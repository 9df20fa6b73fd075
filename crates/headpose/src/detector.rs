//! Landmark detector seam.
//!
//! Face detection and landmark localization are external services. The
//! estimator only depends on the [`LandmarkDetector`] trait.

use std::path::Path;

use headpose_image::Image;
use serde::{Deserialize, Serialize};

use crate::error::HeadPoseError;
use crate::landmarks::FacialLandmarkSet;

/// Axis aligned face bounding region in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceRegion {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width of the region.
    pub width: f64,
    /// Height of the region.
    pub height: f64,
}

/// One face reported by a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Face bounding region.
    #[serde(default)]
    pub region: FaceRegion,
    /// The 68 landmarks of the face.
    pub landmarks: FacialLandmarkSet,
}

/// Failure reported by a landmark detector.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct DetectorError(pub String);

impl From<DetectorError> for HeadPoseError {
    fn from(e: DetectorError) -> Self {
        HeadPoseError::Detector(e.0)
    }
}

/// Face detector plus 68-point landmark predictor.
pub trait LandmarkDetector {
    /// Detect the faces of an RGB image, in a stable order.
    fn detect(&mut self, image: &Image<u8, 3>) -> Result<Vec<DetectedFace>, DetectorError>;
}

/// Detector replaying recorded detections, one frame per call.
///
/// The artifact is a JSON array of frames, each an array of faces:
///
/// ```json
/// [
///   [ { "region": { "x": 0, "y": 0, "width": 10, "height": 10 },
///       "landmarks": [ { "x": 1.0, "y": 2.0 }, ... 68 points ] } ],
///   []
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    frames: Vec<Vec<DetectedFace>>,
    next: usize,
}

impl ReplayDetector {
    /// Load recorded detections from a JSON artifact.
    ///
    /// Fails with [`HeadPoseError::Configuration`] when the file is missing or
    /// malformed, or when a face does not carry exactly 68 landmarks.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HeadPoseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeadPoseError::Configuration(format!(
                "cannot read landmark artifact {}: {e}",
                path.display()
            ))
        })?;
        let frames: Vec<Vec<DetectedFace>> = serde_json::from_str(&content).map_err(|e| {
            HeadPoseError::Configuration(format!(
                "invalid landmark artifact {}: {e}",
                path.display()
            ))
        })?;
        log::debug!(
            "Loaded {} recorded frames from {}",
            frames.len(),
            path.display()
        );
        Ok(Self::new(frames))
    }

    /// Replay the given frames.
    pub fn new(frames: Vec<Vec<DetectedFace>>) -> Self {
        Self { frames, next: 0 }
    }

    /// Number of frames not replayed yet.
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.next)
    }
}

impl LandmarkDetector for ReplayDetector {
    fn detect(&mut self, _image: &Image<u8, 3>) -> Result<Vec<DetectedFace>, DetectorError> {
        let frame = self.frames.get(self.next).cloned().ok_or_else(|| {
            DetectorError(format!(
                "no recorded detections left after {} frames",
                self.frames.len()
            ))
        })?;
        self.next += 1;
        Ok(frame)
    }
}
