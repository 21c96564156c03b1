use crate::shared::frame::Frame;
use crate::shared::geometry::Size;
use crate::video::domain::camera_source::CameraSource;

/// Emits a fixed number of blank frames at a fixed resolution.
///
/// Pairs with a replayed landmark provider, which keys its detections by
/// frame index and never looks at pixels.
pub struct ReplayCamera {
    width: u32,
    height: u32,
    total_frames: usize,
    next_index: usize,
    started: bool,
}

impl ReplayCamera {
    pub fn new(width: u32, height: u32, total_frames: usize) -> Self {
        Self {
            width,
            height,
            total_frames,
            next_index: 0,
            started: false,
        }
    }

    pub fn frames_emitted(&self) -> usize {
        self.next_index
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl CameraSource for ReplayCamera {
    fn start(&mut self) -> Result<Size, Box<dyn std::error::Error>> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("invalid replay resolution {}x{}", self.width, self.height).into());
        }
        self.started = true;
        self.next_index = 0;
        Ok(Size::new(self.width as f64, self.height as f64))
    }

    fn next_frame(&mut self) -> Option<Frame> {
        if !self.started || self.next_index >= self.total_frames {
            return None;
        }
        let frame = Frame::blank(self.width, self.height, self.next_index);
        self.next_index += 1;
        Some(frame)
    }

    fn stop(&mut self) {
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_reports_resolution() {
        let mut cam = ReplayCamera::new(64, 48, 3);
        let size = cam.start().unwrap();
        assert_eq!(size, Size::new(64.0, 48.0));
        assert!(cam.is_started());
    }

    #[test]
    fn test_frames_are_indexed_then_exhausted() {
        let mut cam = ReplayCamera::new(4, 4, 2);
        cam.start().unwrap();
        assert_eq!(cam.next_frame().unwrap().index(), 0);
        assert_eq!(cam.next_frame().unwrap().index(), 1);
        assert!(cam.next_frame().is_none());
        assert_eq!(cam.frames_emitted(), 2);
    }

    #[test]
    fn test_no_frames_before_start_or_after_stop() {
        let mut cam = ReplayCamera::new(4, 4, 5);
        assert!(cam.next_frame().is_none());
        cam.start().unwrap();
        cam.stop();
        cam.stop();
        assert!(cam.next_frame().is_none());
    }

    #[test]
    fn test_zero_resolution_fails_to_start() {
        let mut cam = ReplayCamera::new(0, 48, 1);
        assert!(cam.start().is_err());
    }
}
