use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::detection::domain::landmark_provider::{
    FaceDetection, FaceLandmarkProvider, HandDetection, HandLandmarkProvider,
};
use crate::shared::frame::Frame;

#[derive(Debug, thiserror::Error)]
pub enum ReplayLoadError {
    #[error("failed to read detections from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid detections JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Replays pre-computed detections by frame index.
///
/// Used to drive the try-on loop from exported model output, where the
/// frames themselves carry no pixels worth detecting on.
pub struct ReplayLandmarkProvider<D> {
    cache: Arc<HashMap<usize, Vec<D>>>,
    closed: bool,
}

pub type ReplayFaceProvider = ReplayLandmarkProvider<FaceDetection>;
pub type ReplayHandProvider = ReplayLandmarkProvider<HandDetection>;

impl<D: Clone> ReplayLandmarkProvider<D> {
    pub fn new(cache: Arc<HashMap<usize, Vec<D>>>) -> Self {
        Self {
            cache,
            closed: false,
        }
    }

    /// One entry per frame, in frame order.
    pub fn from_frames(frames: Vec<Vec<D>>) -> Self {
        Self::new(Arc::new(frames.into_iter().enumerate().collect()))
    }

    /// Same detections for every frame index.
    pub fn constant(detections: Vec<D>, frames: usize) -> Self {
        Self::from_frames(vec![detections; frames])
    }

    pub fn frame_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn lookup(&self, frame: &Frame) -> Result<Vec<D>, Box<dyn std::error::Error>> {
        if self.closed {
            return Err("landmark provider is closed".into());
        }
        Ok(self.cache.get(&frame.index()).cloned().unwrap_or_default())
    }
}

impl<D: Clone + DeserializeOwned> ReplayLandmarkProvider<D> {
    /// Parses a JSON array of frames, each an array of detections.
    pub fn from_json_frames(json: &str) -> Result<Self, ReplayLoadError> {
        let frames: Vec<Vec<D>> = serde_json::from_str(json)?;
        Ok(Self::from_frames(frames))
    }

    pub fn load(path: &Path) -> Result<Self, ReplayLoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let provider = Self::from_json_frames(&json)?;
        log::info!(
            "Loaded {} replay frames from {}",
            provider.frame_count(),
            path.display()
        );
        Ok(provider)
    }
}

impl FaceLandmarkProvider for ReplayLandmarkProvider<FaceDetection> {
    fn estimate(&mut self, frame: &Frame) -> Result<Vec<FaceDetection>, Box<dyn std::error::Error>> {
        self.lookup(frame)
    }

    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.closed = false;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

impl HandLandmarkProvider for ReplayLandmarkProvider<HandDetection> {
    fn estimate(&mut self, frame: &Frame) -> Result<Vec<HandDetection>, Box<dyn std::error::Error>> {
        self.lookup(frame)
    }

    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.closed = false;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
