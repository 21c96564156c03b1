use serde::{Deserialize, Serialize};

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Size {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `640x480`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width: f64 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
        let height: f64 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
        if width <= 0.0 || height <= 0.0 {
            return Err(format!("dimensions must be positive, got '{s}'"));
        }
        Ok(Self { width, height })
    }
}

/// A point in display pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PixelPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of the vector `self -> other` in degrees, y pointing down.
    pub fn angle_to_deg(&self, other: &PixelPoint) -> f64 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

/// Axis-aligned box in source pixels, as reported alongside a detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Translate-then-scale transform, the shape of a CSS
/// `translate(x, y) scale(s)` chain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// `self × inner`: applies `inner` first, then `self`.
    pub fn then_inner(&self, inner: &Transform2D) -> Transform2D {
        Transform2D {
            translate_x: self.translate_x + self.scale * inner.translate_x,
            translate_y: self.translate_y + self.scale * inner.translate_y,
            scale: self.scale * inner.scale,
        }
    }

    pub fn apply(&self, p: PixelPoint) -> PixelPoint {
        PixelPoint::new(
            self.translate_x + self.scale * p.x,
            self.translate_y + self.scale * p.y,
        )
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Clamp that never panics: when `max < min` the result is `min`.
pub fn clamp_lenient(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
