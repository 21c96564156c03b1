use serde::{Deserialize, Serialize};

use crate::shared::frame::Frame;
use crate::shared::geometry::BoundingBox;
use crate::shared::landmarks::LandmarkSet;

/// One face found in a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub landmarks: LandmarkSet,
    #[serde(default, rename = "boundingBox", skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl FaceDetection {
    pub fn new(landmarks: LandmarkSet) -> Self {
        Self {
            landmarks,
            bounding_box: None,
        }
    }
}

/// Hand label as reported by the hand model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One hand found in a frame: 21 landmarks plus an optional label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandDetection {
    pub landmarks: LandmarkSet,
    #[serde(default)]
    pub handedness: Option<Handedness>,
}

impl HandDetection {
    pub fn new(landmarks: LandmarkSet, handedness: Option<Handedness>) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }
}

/// Domain interface for the external face mesh model.
///
/// Zero detections is a normal result, not an error. Callers only ever use
/// the first detection.
pub trait FaceLandmarkProvider: Send {
    fn estimate(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>>;

    /// Reacquires model resources after [`close`](Self::close). Default: no-op.
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    /// Releases model resources. Default: no-op.
    fn close(&mut self) {}
}

/// Domain interface for the external hand model.
pub trait HandLandmarkProvider: Send {
    fn estimate(&mut self, frame: &Frame) -> Result<Vec<HandDetection>, Box<dyn std::error::Error>>;

    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn close(&mut self) {}
}
