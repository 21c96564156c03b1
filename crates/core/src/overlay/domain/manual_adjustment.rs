use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::geometry::Transform2D;

/// Pixels moved per directional nudge.
pub const NUDGE_STEP_PX: f64 = 2.0;
/// Factor applied per zoom nudge.
pub const ZOOM_STEP: f64 = 1.05;

/// One button press on the overlay adjustment pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustAction {
    Up,
    Down,
    Left,
    Right,
    ZoomIn,
    ZoomOut,
}

impl AdjustAction {
    pub const ALL: [AdjustAction; 6] = [
        AdjustAction::Up,
        AdjustAction::Down,
        AdjustAction::Left,
        AdjustAction::Right,
        AdjustAction::ZoomIn,
        AdjustAction::ZoomOut,
    ];

    fn name(self) -> &'static str {
        match self {
            AdjustAction::Up => "up",
            AdjustAction::Down => "down",
            AdjustAction::Left => "left",
            AdjustAction::Right => "right",
            AdjustAction::ZoomIn => "zoom-in",
            AdjustAction::ZoomOut => "zoom-out",
        }
    }
}

impl fmt::Display for AdjustAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdjustAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AdjustAction::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| {
                format!("unknown adjustment '{s}' (expected up, down, left, right, zoom-in, zoom-out)")
            })
    }
}

/// Translation and scale layered on top of one computed overlay placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualAdjustment {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl ManualAdjustment {
    pub const IDENTITY: ManualAdjustment = ManualAdjustment {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    pub fn apply(&mut self, action: AdjustAction) {
        match action {
            AdjustAction::Up => self.y -= NUDGE_STEP_PX,
            AdjustAction::Down => self.y += NUDGE_STEP_PX,
            AdjustAction::Left => self.x -= NUDGE_STEP_PX,
            AdjustAction::Right => self.x += NUDGE_STEP_PX,
            AdjustAction::ZoomIn => self.scale *= ZOOM_STEP,
            AdjustAction::ZoomOut => self.scale /= ZOOM_STEP,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn to_transform(&self) -> Transform2D {
        Transform2D {
            translate_x: self.x,
            translate_y: self.y,
            scale: self.scale,
        }
    }
}

impl Default for ManualAdjustment {
    fn default() -> Self {
        Self::IDENTITY
    }
}
