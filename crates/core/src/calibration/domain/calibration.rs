//! Per-session correction factors aligning generic landmark geometry to the
//! measured face.
//!
//! `scale` follows the live jaw width every frame with no smoothing; the
//! vertical offset is measured once and then frozen until [`Calibration::reset`].

use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    AUTO_CALIBRATION_OFFSET_RATIO, CALIBRATION_JAW_LEFT, CALIBRATION_JAW_RIGHT, CHIN,
    DEFAULT_REFERENCE_FACE_WIDTH, NECK_BASE,
};
use crate::shared::geometry::{PixelPoint, Size};
use crate::shared::landmarks::LandmarkSet;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    is_calibrated: bool,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    reference_face_width: f64,
}

/// Manual overrides; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CalibrationAdjustment {
    pub scale: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
}

impl Calibration {
    pub fn new(reference_face_width: f64) -> Self {
        Self {
            is_calibrated: false,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            reference_face_width,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.is_calibrated
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    pub fn reference_face_width(&self) -> f64 {
        self.reference_face_width
    }

    /// Replaces `scale` with the jaw width measured in this frame.
    ///
    /// Leaves `scale` unchanged when either jaw landmark is missing.
    pub fn live_scale_update(&mut self, landmarks: &LandmarkSet, frame_width: f64) -> f64 {
        if let Some((left, right)) = landmarks.pair(CALIBRATION_JAW_LEFT, CALIBRATION_JAW_RIGHT) {
            let face_width_px = (right.x - left.x).abs() * frame_width;
            self.scale = face_width_px / self.reference_face_width;
        }
        self.scale
    }

    /// One-shot vertical offset from the chin-to-neck span.
    ///
    /// Returns true only on the call that performs the calibration.
    pub fn auto_calibrate(&mut self, landmarks: &LandmarkSet) -> bool {
        if self.is_calibrated {
            return false;
        }
        let Some((chin, neck_base)) = landmarks.pair(CHIN, NECK_BASE) else {
            return false;
        };
        self.offset_y = (neck_base.y - chin.y) * AUTO_CALIBRATION_OFFSET_RATIO;
        self.is_calibrated = true;
        log::info!(
            "Auto-calibration complete: offset_y={:.4}, scale={:.3}",
            self.offset_y,
            self.scale
        );
        true
    }

    pub fn adjust(&mut self, adjustment: CalibrationAdjustment) {
        if let Some(scale) = adjustment.scale {
            self.scale = scale;
        }
        if let Some(offset_x) = adjustment.offset_x {
            self.offset_x = offset_x;
        }
        if let Some(offset_y) = adjustment.offset_y {
            self.offset_y = offset_y;
        }
        log::debug!("Calibration updated: {self:?}");
    }

    /// Back to an uncalibrated state; the reference width survives.
    pub fn reset(&mut self) {
        *self = Self::new(self.reference_face_width);
    }

    /// Shifts a raw pixel position by the calibrated offset.
    ///
    /// Offsets are fractions of `frame`, amplified by the current scale.
    pub fn apply(&self, raw: PixelPoint, frame: Size) -> PixelPoint {
        if !self.is_calibrated {
            return raw;
        }
        PixelPoint::new(
            raw.x + self.offset_x * frame.width * self.scale,
            raw.y + self.offset_y * frame.height * self.scale,
        )
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_FACE_WIDTH)
    }
}
