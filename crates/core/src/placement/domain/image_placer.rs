//! Placement on a single uploaded photo.
//!
//! All distances are measured in container pixels after the letterbox
//! transform, so overlays scale with the displayed photo rather than with
//! its natural resolution.

use crate::shared::constants::{
    CHIN, FACE_TOP, LEFT_JAW_CORNER, LEFT_TRAGUS, RIGHT_JAW_CORNER, RIGHT_TRAGUS,
};
use crate::shared::landmarks::LandmarkSet;

use super::overlay_placement::{OverlayPlacement, TransformOrigin};
use super::viewport::{LetterboxViewport, Viewport};

const EARRING_WIDTH_RATIO: f64 = 0.4;
const EARRING_HEIGHT_RATIO: f64 = 0.28;
const EARRING_SIDEWAYS_RATIO: f64 = 0.05;
const EARRING_DROP_RATIO: f64 = 0.06;

const NECKLACE_DROP_RATIO: f64 = 0.40;
const NECKLACE_JAW_RATIO: f64 = 1.45;
const NECKLACE_FACE_HEIGHT_RATIO: f64 = 1.6;
const NECKLACE_HEIGHT_TO_WIDTH: f64 = 0.9;

/// Face extent in container pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceExtent {
    /// Jaw-to-jaw distance.
    pub width_px: f64,
    /// Forehead-to-chin distance.
    pub height_px: f64,
}

impl FaceExtent {
    pub fn measure(landmarks: &LandmarkSet, viewport: &LetterboxViewport) -> Option<Self> {
        let (jaw_left, jaw_right) = landmarks.pair(LEFT_TRAGUS, RIGHT_TRAGUS)?;
        let (face_top, chin) = landmarks.pair(FACE_TOP, CHIN)?;
        Some(Self {
            width_px: viewport.display_distance(jaw_left, jaw_right),
            height_px: viewport.display_distance(face_top, chin),
        })
    }
}

/// Square earring boxes for the left and right lobe.
///
/// The sideways offset follows which lobe lies further right, so a mirrored
/// or strongly tilted face still pushes both earrings outward.
pub fn place_image_earrings(
    landmarks: &LandmarkSet,
    viewport: &LetterboxViewport,
) -> Option<[OverlayPlacement; 2]> {
    let face = FaceExtent::measure(landmarks, viewport)?;
    let (left_lobe, right_lobe) = landmarks.pair(LEFT_JAW_CORNER, RIGHT_JAW_CORNER)?;
    let left = viewport.to_display(left_lobe);
    let right = viewport.to_display(right_lobe);

    let tilt = match (right.x - left.x).partial_cmp(&0.0) {
        Some(std::cmp::Ordering::Less) => -1.0,
        _ => 1.0,
    };
    let dx = face.height_px * EARRING_SIDEWAYS_RATIO * tilt;
    let dy = face.height_px * EARRING_DROP_RATIO;
    let size = (face.width_px * EARRING_WIDTH_RATIO).min(face.height_px * EARRING_HEIGHT_RATIO);

    Some([
        OverlayPlacement::rect(
            left.x - size / 2.0 - dx,
            left.y - size / 2.0 + dy,
            size,
            size,
        ),
        OverlayPlacement::rect(
            right.x - size / 2.0 + dx,
            right.y - size / 2.0 + dy,
            size,
            size,
        ),
    ])
}

/// Necklace box centered between the jaw corners, dropped below the chin.
pub fn place_image_necklace(
    landmarks: &LandmarkSet,
    viewport: &LetterboxViewport,
) -> Option<OverlayPlacement> {
    let face = FaceExtent::measure(landmarks, viewport)?;
    let chin = viewport.to_display(landmarks.get(CHIN)?);
    let (jaw_left, jaw_right) = landmarks.pair(LEFT_TRAGUS, RIGHT_TRAGUS)?;
    let jaw_left = viewport.to_display(jaw_left);
    let jaw_right = viewport.to_display(jaw_right);

    let anchor_x = (jaw_left.x + jaw_right.x) / 2.0;
    let anchor_y = chin.y + face.height_px * NECKLACE_DROP_RATIO;

    let width = (face.width_px * NECKLACE_JAW_RATIO).min(face.height_px * NECKLACE_FACE_HEIGHT_RATIO);
    let height = width * NECKLACE_HEIGHT_TO_WIDTH;

    Some(
        OverlayPlacement::rect(
            anchor_x - width / 2.0,
            anchor_y - height / 2.0,
            width,
            height,
        )
        .with_origin(TransformOrigin::TopCenter),
    )
}
