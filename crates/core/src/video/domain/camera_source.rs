use crate::shared::frame::Frame;
use crate::shared::geometry::Size;

/// A stream of frames for the live try-on loop.
///
/// `start` acquires the device and reports the source resolution; `stop`
/// releases it and must be safe to call more than once.
pub trait CameraSource: Send {
    fn start(&mut self) -> Result<Size, Box<dyn std::error::Error>>;

    /// Next frame, or `None` when no new frame is ready.
    fn next_frame(&mut self) -> Option<Frame>;

    fn stop(&mut self);
}
