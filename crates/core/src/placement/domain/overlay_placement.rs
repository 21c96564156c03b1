use serde::{Deserialize, Serialize};

/// Finger a ring slot is bound to, in base-landmark order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];
}

/// Identity of one overlay element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlaySlot {
    LeftEarring,
    RightEarring,
    Necklace,
    LeftBangle,
    RightBangle,
    Ring(Finger),
}

impl OverlaySlot {
    pub const EARRINGS: [OverlaySlot; 2] = [OverlaySlot::LeftEarring, OverlaySlot::RightEarring];
    pub const BANGLES: [OverlaySlot; 2] = [OverlaySlot::LeftBangle, OverlaySlot::RightBangle];
    pub const RINGS: [OverlaySlot; 4] = [
        OverlaySlot::Ring(Finger::Index),
        OverlaySlot::Ring(Finger::Middle),
        OverlaySlot::Ring(Finger::Ring),
        OverlaySlot::Ring(Finger::Pinky),
    ];

    pub fn is_hand_slot(self) -> bool {
        matches!(
            self,
            OverlaySlot::LeftBangle | OverlaySlot::RightBangle | OverlaySlot::Ring(_)
        )
    }
}

/// Point of the overlay box that rotation and scale pivot around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOrigin {
    #[default]
    Center,
    /// Growth extends downward only.
    TopCenter,
}

/// Final pixel rectangle for one overlay, relative to the display surface.
///
/// `height: None` means the artwork keeps its natural aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: Option<f64>,
    pub rotation_deg: f64,
    pub scale: f64,
    pub origin: TransformOrigin,
}

impl OverlayPlacement {
    pub fn rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height: Some(height),
            rotation_deg: 0.0,
            scale: 1.0,
            origin: TransformOrigin::Center,
        }
    }

    /// Square box of side `width` centered on `(cx, cy)`, rotated about its center.
    pub fn centered_square(cx: f64, cy: f64, width: f64, rotation_deg: f64) -> Self {
        Self {
            rotation_deg,
            ..Self::rect(cx - width / 2.0, cy - width / 2.0, width, width)
        }
    }

    pub fn with_origin(mut self, origin: TransformOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// What a placement pass decided for one slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SlotUpdate {
    Show(OverlayPlacement),
    Hide,
    /// Inputs were incomplete; the element keeps its previous state.
    Keep,
}
