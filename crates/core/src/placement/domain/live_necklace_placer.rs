use crate::calibration::domain::calibration::Calibration;
use crate::catalog::domain::jewelry_item::JewelryKind;
use crate::shared::constants::{
    CHIN, LEFT_TRAGUS, NECKLACE_BASE_WIDTH, NECKLACE_MAX_SCALE, NECKLACE_MIN_SCALE,
    NECKLACE_REFERENCE_WIDTH_PX, NECK_BASE, RIGHT_TRAGUS,
};
use crate::shared::landmarks::{Landmark, LandmarkSet};

use super::overlay_placement::{OverlayPlacement, SlotUpdate, TransformOrigin};
use super::viewport::{FrameMetrics, Viewport};

/// `calibration_scale * clamp(face_width_px / 140, 0.6, 1.4)`.
pub fn necklace_scale(face_width_px: f64, calibration_scale: f64) -> f64 {
    let from_face = (face_width_px / NECKLACE_REFERENCE_WIDTH_PX)
        .clamp(NECKLACE_MIN_SCALE, NECKLACE_MAX_SCALE);
    calibration_scale * from_face
}

/// Necklace anchor between chin and neck base, in normalized coordinates.
pub fn necklace_anchor(chin: &Landmark, neck_base: &Landmark) -> Landmark {
    Landmark::flat(
        chin.x * 0.7 + neck_base.x * 0.3,
        chin.y * 0.4 + neck_base.y * 0.58,
    )
}

/// Places the necklace for one live frame.
///
/// The box is [`NECKLACE_BASE_WIDTH`] wide, hangs from its top-center and
/// grows downward with `scale`. Face width is measured against the source
/// frame, not the display. A set that is not a full face mesh with every
/// necklace anchor yields [`SlotUpdate::Keep`].
pub fn place_live_necklace(
    landmarks: &LandmarkSet,
    metrics: &FrameMetrics,
    calibration: &Calibration,
) -> SlotUpdate {
    if !JewelryKind::Necklace.accepts(landmarks) {
        return SlotUpdate::Keep;
    }
    let (chin, neck_base) = (&landmarks[CHIN], &landmarks[NECK_BASE]);
    let (jaw_left, jaw_right) = (&landmarks[LEFT_TRAGUS], &landmarks[RIGHT_TRAGUS]);

    let raw = metrics.viewport().to_display(&necklace_anchor(chin, neck_base));
    let pos = calibration.apply(raw, metrics.source);

    let face_width_px = (jaw_right.x - jaw_left.x).abs() * metrics.source.width;
    let scale = necklace_scale(face_width_px, calibration.scale());

    SlotUpdate::Show(OverlayPlacement {
        left: pos.x - NECKLACE_BASE_WIDTH / 2.0,
        top: pos.y,
        width: NECKLACE_BASE_WIDTH,
        height: None,
        rotation_deg: 0.0,
        scale,
        origin: TransformOrigin::TopCenter,
    })
}
