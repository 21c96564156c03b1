use crate::shared::geometry::Size;

/// A single camera/image frame: contiguous RGB bytes in row-major order.
///
/// Placement never touches pixels; frames only travel from a
/// [`CameraSource`](crate::video::domain::camera_source::CameraSource) to a
/// landmark provider.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Black RGB frame, for sources whose landmarks come from elsewhere.
    pub fn blank(width: u32, height: u32, index: usize) -> Self {
        Self::new(
            vec![0; (width as usize) * (height as usize) * 3],
            width,
            height,
            3,
            index,
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Natural (unscaled) size of the frame.
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}
