use crate::detection::domain::landmark_provider::{HandDetection, Handedness};
use crate::shared::constants::{
    BANGLE_MIN_WIDTH, FINGER_BASES, FINGER_TIP_OFFSET, MIDDLE_FINGER_MCP, RING_MIN_WIDTH, WRIST,
};

use super::overlay_placement::{Finger, OverlayPlacement, OverlaySlot};
use super::viewport::Viewport;

const BANGLE_WIDTH_FACTOR: f64 = 2.0;
const RING_WIDTH_FACTOR: f64 = 2.2;

/// Places bangles and rings for every detected hand.
///
/// Only slots that received a placement are returned; callers hide all
/// hand slots first so anything not listed stays hidden for this frame.
/// Each hand gets a bangle at the wrist. Rings go on the left hand only.
/// An unlabeled hand wears the right bangle.
pub fn place_hands(
    hands: &[HandDetection],
    viewport: &impl Viewport,
) -> Vec<(OverlaySlot, OverlayPlacement)> {
    let mut placed = Vec::new();
    for hand in hands {
        let is_left = hand.handedness == Some(Handedness::Left);

        if let Some((wrist, mcp)) = hand.landmarks.pair(WRIST, MIDDLE_FINGER_MCP) {
            let wrist = viewport.to_display(wrist);
            let mcp = viewport.to_display(mcp);
            let width = BANGLE_MIN_WIDTH.max((mcp.x - wrist.x).abs() * BANGLE_WIDTH_FACTOR);
            let slot = if is_left {
                OverlaySlot::LeftBangle
            } else {
                OverlaySlot::RightBangle
            };
            placed.push((
                slot,
                OverlayPlacement::centered_square(wrist.x, wrist.y, width, wrist.angle_to_deg(&mcp)),
            ));
        }

        if !is_left {
            continue;
        }
        for (finger, base_index) in Finger::ALL.into_iter().zip(FINGER_BASES) {
            let Some((base, tip)) = hand.landmarks.pair(base_index, base_index + FINGER_TIP_OFFSET)
            else {
                continue;
            };
            let base = viewport.to_display(base);
            let tip = viewport.to_display(tip);
            let width = RING_MIN_WIDTH.max((tip.x - base.x).abs() * RING_WIDTH_FACTOR);
            placed.push((
                OverlaySlot::Ring(finger),
                OverlayPlacement::centered_square(base.x, base.y, width, base.angle_to_deg(&tip)),
            ));
        }
    }
    placed
}
