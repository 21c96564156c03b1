//! Webcam try-on: one detection and placement pass per tick.

use std::time::Instant;

use serde::Serialize;

use crate::calibration::domain::calibration::{Calibration, CalibrationAdjustment};
use crate::catalog::domain::jewelry_catalog::JewelryCatalog;
use crate::catalog::domain::jewelry_item::{JewelryItem, JewelryKind};
use crate::detection::domain::landmark_provider::{FaceLandmarkProvider, HandLandmarkProvider};
use crate::overlay::domain::overlay_registry::{slots_of, OverlayRegistry, PlacedOverlay};
use crate::placement::domain::hand_placer::place_hands;
use crate::placement::domain::live_earring_placer::place_live_earrings;
use crate::placement::domain::live_necklace_placer::place_live_necklace;
use crate::placement::domain::overlay_placement::{OverlaySlot, SlotUpdate};
use crate::placement::domain::viewport::FrameMetrics;
use crate::shared::constants::DEFAULT_REFERENCE_FACE_WIDTH;
use crate::shared::frame::Frame;
use crate::shared::geometry::Size;
use crate::shared::landmarks::LandmarkSet;
use crate::video::domain::camera_source::CameraSource;

use super::session_error::SessionError;
use super::session_logger::SessionLogger;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveSessionOptions {
    /// Size of the element the video is shown in. `None` shows the video at
    /// its source resolution.
    pub display: Option<Size>,
    pub reference_face_width: f64,
}

impl Default for LiveSessionOptions {
    fn default() -> Self {
        Self {
            display: None,
            reference_face_width: DEFAULT_REFERENCE_FACE_WIDTH,
        }
    }
}

/// What one tick did.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FrameOutcome {
    Stopped,
    /// Hidden, or nothing selected that needs tracking.
    Paused,
    NoFrame,
    Processed {
        frame: usize,
        faces: usize,
        hands: usize,
    },
}

pub struct LiveSession {
    camera: Box<dyn CameraSource>,
    face_provider: Box<dyn FaceLandmarkProvider>,
    hand_provider: Option<Box<dyn HandLandmarkProvider>>,
    catalog: JewelryCatalog,
    logger: Box<dyn SessionLogger>,
    registry: OverlayRegistry,
    calibration: Calibration,
    metrics: FrameMetrics,
    options: LiveSessionOptions,
    running: bool,
    visible: bool,
}

impl LiveSession {
    /// Starts the camera and returns a running session with nothing selected.
    ///
    /// Start-up failures are classified into a user-facing
    /// [`SessionError::Init`].
    pub fn start(
        mut camera: Box<dyn CameraSource>,
        face_provider: Box<dyn FaceLandmarkProvider>,
        catalog: JewelryCatalog,
        options: LiveSessionOptions,
        mut logger: Box<dyn SessionLogger>,
    ) -> Result<Self, SessionError> {
        let source = camera.start().map_err(|e| {
            let err = SessionError::init(format!("Camera initialization failed: {e}"));
            log::error!("{err} ({e})");
            err
        })?;
        let display = options.display.unwrap_or(source);
        logger.info(&format!("Camera started: source {source}, display {display}"));

        Ok(Self {
            camera,
            face_provider,
            hand_provider: None,
            catalog,
            logger,
            registry: OverlayRegistry::new(),
            calibration: Calibration::new(options.reference_face_width),
            metrics: FrameMetrics::new(display, source),
            options,
            running: true,
            visible: true,
        })
    }

    pub fn with_hand_provider(mut self, provider: Box<dyn HandLandmarkProvider>) -> Self {
        self.hand_provider = Some(provider);
        self
    }

    /// Makes the catalog item `item_id` the active jewelry of its kind.
    pub fn select(&mut self, item_id: &str) -> Result<(), SessionError> {
        let Some(item) = self.catalog.find(item_id) else {
            log::warn!("Jewelry config not found for id: {item_id}");
            return Err(SessionError::UnknownItem(item_id.to_string()));
        };
        self.registry.select(item);
        log::debug!("Selected {} '{}'", item.kind, item.id);
        Ok(())
    }

    /// Runs one detection and placement pass.
    ///
    /// Detection errors are returned for this tick only; the session keeps
    /// running and the next tick tries again.
    pub fn tick(&mut self) -> Result<FrameOutcome, SessionError> {
        if !self.running {
            return Ok(FrameOutcome::Stopped);
        }
        if !self.visible || !self.registry.is_tracking_needed() {
            return Ok(FrameOutcome::Paused);
        }
        let Some(frame) = self.camera.next_frame() else {
            return Ok(FrameOutcome::NoFrame);
        };

        let faces = if self.registry.face_tracking_needed() {
            self.track_face(&frame)?
        } else {
            0
        };
        let hands = if self.registry.hand_tracking_needed() {
            self.track_hands(&frame)?
        } else {
            0
        };

        self.logger.frame();
        self.logger.metric("faces", faces as f64);
        self.logger.metric("hands", hands as f64);
        Ok(FrameOutcome::Processed {
            frame: frame.index(),
            faces,
            hands,
        })
    }

    fn track_face(&mut self, frame: &Frame) -> Result<usize, SessionError> {
        let t0 = Instant::now();
        let detections = self
            .face_provider
            .estimate(frame)
            .map_err(|e| SessionError::Detection(e.to_string()))?;
        self.logger
            .timing("detect", t0.elapsed().as_secs_f64() * 1000.0);

        let Some(face) = detections.first() else {
            return Ok(0);
        };

        let t0 = Instant::now();
        self.calibration
            .live_scale_update(&face.landmarks, self.metrics.source.width);
        self.calibration.auto_calibrate(&face.landmarks);
        self.place_face_jewelry(&face.landmarks);
        self.logger
            .timing("place", t0.elapsed().as_secs_f64() * 1000.0);
        Ok(detections.len())
    }

    fn place_face_jewelry(&mut self, landmarks: &LandmarkSet) {
        let earring_aspect = self
            .active_item(JewelryKind::Earrings)
            .map(|item| item.aspect_ratio);
        if let Some(aspect_ratio) = earring_aspect {
            match place_live_earrings(landmarks, &self.metrics.viewport(), aspect_ratio) {
                Some(earrings) => {
                    self.registry.apply(OverlaySlot::LeftEarring, earrings.left);
                    self.registry.apply(OverlaySlot::RightEarring, earrings.right);
                }
                None => log::debug!("Skipping earrings: {} landmarks", landmarks.len()),
            }
        }

        if self.registry.active(JewelryKind::Necklace).is_some() {
            let update = place_live_necklace(landmarks, &self.metrics, &self.calibration);
            if update == SlotUpdate::Keep {
                log::debug!("Skipping necklace: anchor landmarks missing");
            }
            self.registry.apply(OverlaySlot::Necklace, update);
        }
    }

    fn track_hands(&mut self, frame: &Frame) -> Result<usize, SessionError> {
        let Some(provider) = self.hand_provider.as_mut() else {
            return Ok(0);
        };
        let t0 = Instant::now();
        let hands = provider
            .estimate(frame)
            .map_err(|e| SessionError::Detection(e.to_string()))?;
        self.logger
            .timing("hands", t0.elapsed().as_secs_f64() * 1000.0);

        self.registry.hide_hand_overlays();
        let wanted: Vec<OverlaySlot> = [JewelryKind::Bangle, JewelryKind::Ring]
            .into_iter()
            .filter(|kind| self.registry.active(*kind).is_some())
            .flat_map(|kind| slots_of(kind).iter().copied())
            .collect();
        for (slot, placement) in place_hands(&hands, &self.metrics.viewport()) {
            if wanted.contains(&slot) {
                self.registry.apply(slot, SlotUpdate::Show(placement));
            }
        }
        Ok(hands.len())
    }

    fn active_item(&self, kind: JewelryKind) -> Option<&JewelryItem> {
        self.registry
            .active(kind)
            .and_then(|id| self.catalog.find(id))
    }

    /// Pauses or resumes tracking without releasing the camera.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Releases the camera and models and hides every overlay. Idempotent.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.camera.stop();
        self.face_provider.close();
        if let Some(provider) = self.hand_provider.as_mut() {
            provider.close();
        }
        self.registry.hide_all();
        self.logger.info("Camera stopped");
        self.logger.summary();
    }

    /// Reacquires the camera and models with a fresh calibration.
    /// Selections survive.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.stop();
        let source = self
            .camera
            .start()
            .map_err(|e| SessionError::init(format!("Camera initialization failed: {e}")))?;
        if let Err(err) = self.open_models() {
            log::error!("{err}");
            self.camera.stop();
            return Err(err);
        }
        let display = self.options.display.unwrap_or(source);
        self.metrics = FrameMetrics::new(display, source);
        self.calibration.reset();
        self.running = true;
        self.logger.info("Camera restarted");
        Ok(())
    }

    fn open_models(&mut self) -> Result<(), SessionError> {
        self.face_provider
            .open()
            .map_err(|e| SessionError::init(format!("Face model failed to load: {e}")))?;
        if let Some(provider) = self.hand_provider.as_mut() {
            provider
                .open()
                .map_err(|e| SessionError::init(format!("Hand model failed to load: {e}")))?;
        }
        Ok(())
    }

    pub fn adjust_calibration(&mut self, adjustment: CalibrationAdjustment) {
        self.calibration.adjust(adjustment);
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> FrameMetrics {
        self.metrics
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn placements(&self) -> Vec<PlacedOverlay> {
        self.registry.visible_placements()
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.stop();
    }
}
