use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    CALIBRATION_JAW_LEFT, CALIBRATION_JAW_RIGHT, CHIN, FINGER_BASES, FINGER_TIP_OFFSET,
    LEFT_HELIX_TOP, LEFT_JAW_CORNER, LEFT_TRAGUS, MIDDLE_FINGER_MCP, NECK_BASE, NOSE_TIP,
    RIGHT_HELIX_TOP, RIGHT_JAW_CORNER, RIGHT_TRAGUS, WRIST,
};
use crate::shared::landmarks::LandmarkSet;

/// Closed set of jewelry kinds; each selects its own placement strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JewelryKind {
    Earrings,
    Necklace,
    Bangle,
    Ring,
}

const EARRING_ANCHORS: &[usize] = &[
    CALIBRATION_JAW_LEFT,
    CALIBRATION_JAW_RIGHT,
    NOSE_TIP,
    LEFT_TRAGUS,
    LEFT_HELIX_TOP,
    LEFT_JAW_CORNER,
    RIGHT_TRAGUS,
    RIGHT_HELIX_TOP,
    RIGHT_JAW_CORNER,
];
const NECKLACE_ANCHORS: &[usize] = &[
    CALIBRATION_JAW_LEFT,
    CALIBRATION_JAW_RIGHT,
    CHIN,
    NECK_BASE,
    LEFT_TRAGUS,
    RIGHT_TRAGUS,
];
const BANGLE_ANCHORS: &[usize] = &[WRIST, MIDDLE_FINGER_MCP];
const RING_ANCHORS: &[usize] = &[
    FINGER_BASES[0],
    FINGER_BASES[0] + FINGER_TIP_OFFSET,
    FINGER_BASES[1],
    FINGER_BASES[1] + FINGER_TIP_OFFSET,
    FINGER_BASES[2],
    FINGER_BASES[2] + FINGER_TIP_OFFSET,
    FINGER_BASES[3],
    FINGER_BASES[3] + FINGER_TIP_OFFSET,
];

impl JewelryKind {
    pub const ALL: &[JewelryKind] = &[
        JewelryKind::Earrings,
        JewelryKind::Necklace,
        JewelryKind::Bangle,
        JewelryKind::Ring,
    ];

    /// Landmark indices the live pass reads for this kind, including the
    /// jaw pair the live scale is measured from for face jewelry.
    ///
    /// Face indices for earrings/necklaces, hand indices for bangles/rings.
    pub fn anchor_landmarks(self) -> &'static [usize] {
        match self {
            JewelryKind::Earrings => EARRING_ANCHORS,
            JewelryKind::Necklace => NECKLACE_ANCHORS,
            JewelryKind::Bangle => BANGLE_ANCHORS,
            JewelryKind::Ring => RING_ANCHORS,
        }
    }

    /// Whether `landmarks` carries every anchor of this kind. Face kinds
    /// also need a full face mesh.
    pub fn accepts(self, landmarks: &LandmarkSet) -> bool {
        let shape_ok = self.is_hand_worn() || landmarks.is_face_mesh();
        shape_ok && landmarks.has_all(self.anchor_landmarks())
    }

    pub fn is_hand_worn(self) -> bool {
        matches!(self, JewelryKind::Bangle | JewelryKind::Ring)
    }
}

impl std::fmt::Display for JewelryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JewelryKind::Earrings => write!(f, "earrings"),
            JewelryKind::Necklace => write!(f, "necklace"),
            JewelryKind::Bangle => write!(f, "bangle"),
            JewelryKind::Ring => write!(f, "ring"),
        }
    }
}

fn default_aspect_ratio() -> f64 {
    1.0
}

/// An immutable catalog entry.
///
/// `aspect_ratio` is the artwork's height / width and sizes overlays whose
/// height is derived from their width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JewelryItem {
    pub id: String,
    #[serde(rename = "path", alias = "imagePath")]
    pub image_path: String,
    #[serde(rename = "type")]
    pub kind: JewelryKind,
    #[serde(rename = "aspectRatio", default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
}

impl JewelryItem {
    pub fn new(id: &str, image_path: &str, kind: JewelryKind) -> Self {
        Self {
            id: id.to_string(),
            image_path: image_path.to_string(),
            kind,
            aspect_ratio: default_aspect_ratio(),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }
}
