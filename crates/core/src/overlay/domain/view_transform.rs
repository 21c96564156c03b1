use serde::{Deserialize, Serialize};

use crate::shared::geometry::Transform2D;

use super::manual_adjustment::ManualAdjustment;

pub const VIEW_ZOOM_STEP: f64 = 1.1;
pub const VIEW_MIN_ZOOM: f64 = 0.3;
pub const VIEW_MAX_ZOOM: f64 = 3.0;

/// Pan and zoom of the whole upload container (photo plus overlays).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ViewTransform {
    pub fn zoom_in(&mut self) {
        self.zoom = clamp_zoom(self.zoom * VIEW_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = clamp_zoom(self.zoom / VIEW_ZOOM_STEP);
    }

    /// Drag by a pointer delta in pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_transform(&self) -> Transform2D {
        Transform2D {
            translate_x: self.offset_x,
            translate_y: self.offset_y,
            scale: self.zoom,
        }
    }

    /// Container transform applied after the overlay's own adjustment.
    pub fn compose(&self, item: &ManualAdjustment) -> Transform2D {
        self.to_transform().then_inner(&item.to_transform())
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(VIEW_MIN_ZOOM, VIEW_MAX_ZOOM)
}
