//! Try-on over one uploaded photo.
//!
//! Detection runs once per image. Each applied item gets its own overlay,
//! replacing any previous overlay of the same kind, and becomes the target of
//! the manual adjustment pad. The whole container can be panned and zoomed
//! independently.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::domain::jewelry_catalog::JewelryCatalog;
use crate::catalog::domain::jewelry_item::JewelryKind;
use crate::detection::domain::landmark_provider::{FaceDetection, FaceLandmarkProvider};
use crate::overlay::domain::manual_adjustment::{AdjustAction, ManualAdjustment};
use crate::overlay::domain::overlay_registry::{OverlayRegistry, PlacedOverlay};
use crate::overlay::domain::view_transform::ViewTransform;
use crate::placement::domain::image_placer::{place_image_earrings, place_image_necklace};
use crate::placement::domain::overlay_placement::OverlaySlot;
use crate::placement::domain::viewport::LetterboxViewport;
use crate::shared::constants::{CHIN, FACE_TOP, LEFT_JAW_CORNER, RIGHT_JAW_CORNER};
use crate::shared::frame::Frame;
use crate::shared::geometry::{Size, Transform2D};
use crate::shared::landmarks::LandmarkSet;

use super::session_error::SessionError;

/// Ear-to-ear width and forehead-to-chin height, normalized to the image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FaceDimensions {
    pub width: f64,
    pub height: f64,
}

impl FaceDimensions {
    pub fn measure(landmarks: &LandmarkSet) -> Option<Self> {
        let (left_ear, right_ear) = landmarks.pair(LEFT_JAW_CORNER, RIGHT_JAW_CORNER)?;
        let (top, chin) = landmarks.pair(FACE_TOP, CHIN)?;
        Some(Self {
            width: (right_ear.x - left_ear.x).abs(),
            height: (chin.y - top.y).abs(),
        })
    }
}

pub struct UploadSession {
    catalog: JewelryCatalog,
    container: Size,
    natural: Option<Size>,
    landmarks: Option<LandmarkSet>,
    face_dimensions: Option<FaceDimensions>,
    detecting: bool,
    registry: OverlayRegistry,
    adjustments: BTreeMap<JewelryKind, ManualAdjustment>,
    selected: Option<JewelryKind>,
    view: ViewTransform,
}

impl UploadSession {
    pub fn new(catalog: JewelryCatalog, container: Size) -> Self {
        Self {
            catalog,
            container,
            natural: None,
            landmarks: None,
            face_dimensions: None,
            detecting: false,
            registry: OverlayRegistry::new(),
            adjustments: BTreeMap::new(),
            selected: None,
            view: ViewTransform::default(),
        }
    }

    /// Starts analyzing a new image and forgets everything about the old one.
    pub fn begin_image(&mut self, natural: Size) {
        self.natural = Some(natural);
        self.landmarks = None;
        self.face_dimensions = None;
        self.detecting = true;
        self.clear_overlays();
    }

    /// Finishes the detection started by [`begin_image`](Self::begin_image).
    ///
    /// Only the first face is used. With no face the session keeps the image
    /// but stays without landmarks until another image is loaded.
    pub fn complete_detection(
        &mut self,
        result: Result<Vec<FaceDetection>, Box<dyn std::error::Error>>,
    ) -> Result<FaceDimensions, SessionError> {
        self.detecting = false;
        let detections = result.map_err(|e| {
            log::error!("Face detection error: {e}");
            SessionError::Detection(e.to_string())
        })?;
        let Some(face) = detections.into_iter().next() else {
            return Err(SessionError::NoFaceDetected);
        };
        let dims = FaceDimensions::measure(&face.landmarks).ok_or(SessionError::NoFaceDetected)?;
        log::info!(
            "Face analyzed: {} landmarks, {:.3} x {:.3}",
            face.landmarks.len(),
            dims.width,
            dims.height
        );
        self.landmarks = Some(face.landmarks);
        self.face_dimensions = Some(dims);
        Ok(dims)
    }

    /// Runs `provider` on `frame` as a freshly loaded image.
    pub fn load_image(
        &mut self,
        frame: &Frame,
        provider: &mut dyn FaceLandmarkProvider,
    ) -> Result<FaceDimensions, SessionError> {
        self.begin_image(frame.size());
        let result = provider.estimate(frame);
        self.complete_detection(result)
    }

    /// Places catalog item `item_id` on the analyzed face and selects it.
    ///
    /// Any overlay of the same kind is removed first. If the face lacks the
    /// landmarks the kind needs, nothing is placed and nothing is selected.
    pub fn apply(&mut self, item_id: &str) -> Result<(), SessionError> {
        if self.detecting {
            return Err(SessionError::DetectionInProgress);
        }
        let (Some(landmarks), Some(natural)) = (self.landmarks.as_ref(), self.natural) else {
            return Err(SessionError::NoImageAnalyzed);
        };
        if self.face_dimensions.is_none() {
            return Err(SessionError::NoImageAnalyzed);
        }
        let item = self
            .catalog
            .find(item_id)
            .ok_or_else(|| SessionError::UnknownItem(item_id.to_string()))?;
        if item.kind.is_hand_worn() {
            return Err(SessionError::UnsupportedInUpload(item.kind));
        }

        self.registry.remove_kind(item.kind);
        self.adjustments.remove(&item.kind);
        self.selected = None;

        let viewport = LetterboxViewport::new(natural, self.container);
        let placed = match item.kind {
            JewelryKind::Earrings => place_image_earrings(landmarks, &viewport).map(|[left, right]| {
                self.registry.insert(OverlaySlot::LeftEarring, item, left);
                self.registry.insert(OverlaySlot::RightEarring, item, right);
            }),
            JewelryKind::Necklace => place_image_necklace(landmarks, &viewport)
                .map(|p| self.registry.insert(OverlaySlot::Necklace, item, p)),
            JewelryKind::Bangle | JewelryKind::Ring => None,
        };

        if placed.is_none() {
            log::debug!("Skipping {}: required landmarks missing", item.id);
            return Ok(());
        }
        self.adjustments.insert(item.kind, ManualAdjustment::IDENTITY);
        self.selected = Some(item.kind);
        Ok(())
    }

    /// Nudges the selected overlay. Returns false when nothing is selected.
    pub fn adjust(&mut self, action: AdjustAction) -> bool {
        let Some(adjustment) = self
            .selected
            .and_then(|kind| self.adjustments.get_mut(&kind))
        else {
            return false;
        };
        adjustment.apply(action);
        true
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.view.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Removes every overlay and the selection. Landmarks are kept.
    pub fn clear_overlays(&mut self) {
        self.registry.clear();
        self.adjustments.clear();
        self.selected = None;
    }

    pub fn overlays(&self) -> Vec<PlacedOverlay> {
        self.registry.visible_placements()
    }

    /// Container transform composed with the overlay's own adjustment, or
    /// `None` when no overlay of `kind` is placed.
    pub fn effective_transform(&self, kind: JewelryKind) -> Option<Transform2D> {
        self.registry.active(kind)?;
        let adjustment = self
            .adjustments
            .get(&kind)
            .copied()
            .unwrap_or(ManualAdjustment::IDENTITY);
        Some(self.view.compose(&adjustment))
    }

    pub fn adjustment(&self, kind: JewelryKind) -> Option<ManualAdjustment> {
        self.adjustments.get(&kind).copied()
    }

    pub fn selected(&self) -> Option<JewelryKind> {
        self.selected
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn is_detecting(&self) -> bool {
        self.detecting
    }

    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        self.landmarks.as_ref()
    }

    pub fn face_dimensions(&self) -> Option<FaceDimensions> {
        self.face_dimensions
    }

    pub fn viewport(&self) -> Option<LetterboxViewport> {
        self.natural
            .map(|natural| LetterboxViewport::new(natural, self.container))
    }
}
