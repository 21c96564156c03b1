use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::geometry::Size;
use crate::video::domain::camera_source::CameraSource;

#[derive(Debug, thiserror::Error)]
pub enum ImageReadError {
    #[error("failed to read image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decodes an image file into an RGB frame with index 0.
pub fn read_image(path: &Path) -> Result<Frame, ImageReadError> {
    let rgb = image::open(path)
        .map_err(|source| ImageReadError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height, 3, 0))
}

/// Adapts a single image file to the [`CameraSource`] interface.
///
/// The image is decoded on `start` and handed out once as frame 0.
pub struct ImageFileReader {
    path: PathBuf,
    frame: Option<Frame>,
}

impl ImageFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }
}

impl CameraSource for ImageFileReader {
    fn start(&mut self) -> Result<Size, Box<dyn std::error::Error>> {
        let frame = read_image(&self.path)?;
        let size = frame.size();
        log::info!("Opened image {} ({size})", self.path.display());
        self.frame = Some(frame);
        Ok(size)
    }

    fn next_frame(&mut self) -> Option<Frame> {
        self.frame.take()
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}
