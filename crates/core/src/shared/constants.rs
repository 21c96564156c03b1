//! Landmark indices and placement constants.

// Face mesh topology (468/478 points).
pub const NOSE_TIP: usize = 1;
pub const FACE_TOP: usize = 10;
pub const CHIN: usize = 152;
pub const NECK_BASE: usize = 200;
pub const LEFT_TRAGUS: usize = 234;
pub const RIGHT_TRAGUS: usize = 454;
pub const LEFT_HELIX_TOP: usize = 127;
pub const RIGHT_HELIX_TOP: usize = 356;
pub const LEFT_JAW_CORNER: usize = 132;
pub const RIGHT_JAW_CORNER: usize = 361;
/// Jaw pair the live scale is measured from. Narrower than the tragus pair.
pub const CALIBRATION_JAW_LEFT: usize = 93;
pub const CALIBRATION_JAW_RIGHT: usize = 323;

// Hand topology (21 points).
pub const WRIST: usize = 0;
pub const MIDDLE_FINGER_MCP: usize = 9;
/// Finger bases for index, middle, ring, pinky. Each tip-side joint is `base + 3`.
pub const FINGER_BASES: [usize; 4] = [5, 9, 13, 17];
pub const FINGER_TIP_OFFSET: usize = 3;

/// Real face width the live scale is measured against.
pub const DEFAULT_REFERENCE_FACE_WIDTH: f64 = 0.14;
/// Fraction of the chin-to-neck span used as the one-shot vertical offset.
pub const AUTO_CALIBRATION_OFFSET_RATIO: f64 = 0.35;

pub const EARRING_MAX_WIDTH: f64 = 60.0;
pub const EARRING_JAW_DIVISOR: f64 = 6.0;
pub const EARRING_HORIZONTAL_NUDGE: f64 = 3.2;

pub const NECKLACE_BASE_WIDTH: f64 = 120.0;
pub const NECKLACE_REFERENCE_WIDTH_PX: f64 = 140.0;
pub const NECKLACE_MIN_SCALE: f64 = 0.6;
pub const NECKLACE_MAX_SCALE: f64 = 1.4;

pub const BANGLE_MIN_WIDTH: f64 = 40.0;
pub const RING_MIN_WIDTH: f64 = 18.0;

pub const DEFAULT_DISPLAY_WIDTH: f64 = 640.0;
pub const DEFAULT_DISPLAY_HEIGHT: f64 = 480.0;
/// Upload container: 480px wide at a 4:5 aspect ratio.
pub const DEFAULT_CONTAINER_WIDTH: f64 = 480.0;
pub const DEFAULT_CONTAINER_HEIGHT: f64 = 600.0;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
