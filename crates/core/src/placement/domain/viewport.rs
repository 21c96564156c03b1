//! Normalized-landmark to display-pixel mapping.
//!
//! Live video fills its element exactly, so a landmark maps by plain
//! multiplication. Uploaded images are `object-fit: contain` inside their
//! container and map through a letterbox transform.

use crate::shared::geometry::{PixelPoint, Size};
use crate::shared::landmarks::Landmark;

pub trait Viewport {
    fn to_display(&self, point: &Landmark) -> PixelPoint;

    /// Size of the surface overlays are positioned on.
    fn display_size(&self) -> Size;

    fn display_distance(&self, a: &Landmark, b: &Landmark) -> f64 {
        self.to_display(a).distance(&self.to_display(b))
    }
}

/// Source frame stretched to fill the display element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillViewport {
    display: Size,
}

impl FillViewport {
    pub fn new(display: Size) -> Self {
        Self { display }
    }
}

impl Viewport for FillViewport {
    fn to_display(&self, point: &Landmark) -> PixelPoint {
        PixelPoint::new(point.x * self.display.width, point.y * self.display.height)
    }

    fn display_size(&self) -> Size {
        self.display
    }
}

/// Image fitted inside a container with its aspect ratio preserved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LetterboxViewport {
    natural: Size,
    container: Size,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl LetterboxViewport {
    pub fn new(natural: Size, container: Size) -> Self {
        let (scale, offset_x, offset_y) = if natural.aspect() > container.aspect() {
            // Fit by width, bars above and below.
            let scale = container.width / natural.width;
            (scale, 0.0, (container.height - natural.height * scale) / 2.0)
        } else {
            // Fit by height, bars left and right.
            let scale = container.height / natural.height;
            (scale, (container.width - natural.width * scale) / 2.0, 0.0)
        };
        Self {
            natural,
            container,
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Display pixels per natural image pixel.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> PixelPoint {
        PixelPoint::new(self.offset_x, self.offset_y)
    }

    pub fn natural_size(&self) -> Size {
        self.natural
    }
}

impl Viewport for LetterboxViewport {
    fn to_display(&self, point: &Landmark) -> PixelPoint {
        PixelPoint::new(
            point.x * self.natural.width * self.scale + self.offset_x,
            point.y * self.natural.height * self.scale + self.offset_y,
        )
    }

    fn display_size(&self) -> Size {
        self.container
    }
}

/// Display and source sizes of a live frame.
///
/// Earring math runs in display pixels while necklace scale and calibration
/// offsets use the source resolution; the two are kept apart on purpose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMetrics {
    pub display: Size,
    pub source: Size,
}

impl FrameMetrics {
    pub fn new(display: Size, source: Size) -> Self {
        Self { display, source }
    }

    pub fn viewport(&self) -> FillViewport {
        FillViewport::new(self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fill_viewport_multiplies() {
        let vp = FillViewport::new(Size::new(640.0, 480.0));
        let p = vp.to_display(&Landmark::flat(0.5, 0.25));
        assert_relative_eq!(p.x, 320.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_letterbox_wide_image_fits_width() {
        // 1000x500 into 480x600: scale 0.48, image height 240, bars of 180.
        let vp = LetterboxViewport::new(Size::new(1000.0, 500.0), Size::new(480.0, 600.0));
        assert_relative_eq!(vp.scale(), 0.48, epsilon = 1e-9);
        assert_relative_eq!(vp.offset().x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(vp.offset().y, 180.0, epsilon = 1e-9);

        let top_left = vp.to_display(&Landmark::flat(0.0, 0.0));
        let bottom_right = vp.to_display(&Landmark::flat(1.0, 1.0));
        assert_relative_eq!(top_left.y, 180.0, epsilon = 1e-9);
        assert_relative_eq!(bottom_right.x, 480.0, epsilon = 1e-9);
        assert_relative_eq!(bottom_right.y, 420.0, epsilon = 1e-9);
    }

    #[test]
    fn test_letterbox_tall_image_fits_height() {
        // 600x1200 into 480x600: scale 0.5, image width 300, bars of 90.
        let vp = LetterboxViewport::new(Size::new(600.0, 1200.0), Size::new(480.0, 600.0));
        assert_relative_eq!(vp.scale(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(vp.offset().x, 90.0, epsilon = 1e-9);
        assert_relative_eq!(vp.offset().y, 0.0, epsilon = 1e-9);
        let center = vp.to_display(&Landmark::flat(0.5, 0.5));
        assert_relative_eq!(center.x, 240.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_letterbox_equal_aspect_has_no_bars() {
        let vp = LetterboxViewport::new(Size::new(960.0, 1200.0), Size::new(480.0, 600.0));
        assert_relative_eq!(vp.scale(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(vp.offset().x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(vp.offset().y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_display_distance() {
        let vp = FillViewport::new(Size::new(640.0, 480.0));
        let d = vp.display_distance(&Landmark::flat(0.3, 0.5), &Landmark::flat(0.7, 0.5));
        assert_relative_eq!(d, 256.0, epsilon = 1e-9);
    }
}
