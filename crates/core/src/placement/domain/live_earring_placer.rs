//! Earring placement on a live face mesh.
//!
//! The earlobe is not a mesh landmark, so it is estimated from the tragus,
//! the top of the helix and the jaw corner. A frontal model extrapolates past
//! the jaw corner, a profile model drops below the tragus, and the two are
//! blended by how far the head is turned.

use crate::catalog::domain::jewelry_item::JewelryKind;
use crate::shared::constants::{
    EARRING_HORIZONTAL_NUDGE, EARRING_JAW_DIVISOR, EARRING_MAX_WIDTH, LEFT_HELIX_TOP, LEFT_JAW_CORNER, LEFT_TRAGUS, NOSE_TIP, RIGHT_HELIX_TOP, RIGHT_JAW_CORNER,
    RIGHT_TRAGUS,
};
use crate::shared::geometry::clamp_lenient;
use crate::shared::landmarks::{Landmark, LandmarkSet};

use super::overlay_placement::{OverlayPlacement, SlotUpdate};
use super::viewport::Viewport;

/// Extrapolation along tragus -> jaw corner for the frontal estimate.
const FRONT_EXTRAPOLATION: f64 = 1.15;
/// Outward shift of the profile estimate, as a fraction of tragus-to-jaw distance.
const SIDE_OUTWARD_RATIO: f64 = 0.35;
/// Downward shift of the profile estimate, as a fraction of tragus-to-helix distance.
const SIDE_DROP_RATIO: f64 = 0.8;
/// Horizontal tragus-to-nose distance at which the profile model fully takes over.
const FULL_PROFILE_DX: f64 = 0.25;

const MIN_VISIBLE_DEPTH: f64 = 15.0;
const MAX_VISIBLE_DEPTH: f64 = 50.0;
const MIN_VISIBLE_SIDE_DX: f64 = 0.04;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EarSide {
    Left,
    Right,
}

impl EarSide {
    /// (tragus, helix top, jaw corner)
    fn landmark_indices(self) -> (usize, usize, usize) {
        match self {
            EarSide::Left => (LEFT_TRAGUS, LEFT_HELIX_TOP, LEFT_JAW_CORNER),
            EarSide::Right => (RIGHT_TRAGUS, RIGHT_HELIX_TOP, RIGHT_JAW_CORNER),
        }
    }

    /// Direction away from the face midline in image x.
    fn outward(self) -> f64 {
        match self {
            EarSide::Left => -1.0,
            EarSide::Right => 1.0,
        }
    }
}

/// Placement decision for both earrings of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EarringPlacement {
    pub width: f64,
    pub left: SlotUpdate,
    pub right: SlotUpdate,
}

/// `min(60, jaw_span / 6)`.
pub fn earring_width(jaw_span_px: f64) -> f64 {
    (jaw_span_px / EARRING_JAW_DIVISOR).min(EARRING_MAX_WIDTH)
}

/// Normalized earlobe estimate for one side; `z` is the jaw corner's depth.
pub fn estimate_earlobe(landmarks: &LandmarkSet, side: EarSide) -> Option<Landmark> {
    let (tragus_idx, helix_idx, jaw_idx) = side.landmark_indices();
    let tragus = landmarks.get(tragus_idx)?;
    let helix_top = landmarks.get(helix_idx)?;
    let jaw_corner = landmarks.get(jaw_idx)?;
    let nose = landmarks.get(NOSE_TIP)?;

    let ear_height = tragus.planar_distance(helix_top);
    let ear_width = tragus.planar_distance(jaw_corner);

    let blend = ((tragus.x - nose.x).abs() / FULL_PROFILE_DX).min(1.0);

    let front_x = tragus.x + (jaw_corner.x - tragus.x) * FRONT_EXTRAPOLATION;
    let front_y = tragus.y + (jaw_corner.y - tragus.y) * FRONT_EXTRAPOLATION;

    let side_x = tragus.x + side.outward() * ear_width * SIDE_OUTWARD_RATIO;
    let side_y = tragus.y + ear_height * SIDE_DROP_RATIO;

    Some(Landmark::new(
        front_x * (1.0 - blend) + side_x * blend,
        front_y * (1.0 - blend) + side_y * blend,
        jaw_corner.z,
    ))
}

/// An ear counts as visible by depth contrast or by sideways distance from
/// the nose; either signal alone is enough.
pub fn is_ear_visible(ear: &Landmark, nose: &Landmark) -> bool {
    let dz = (ear.z - nose.z).abs();
    let dx = (ear.x - nose.x).abs();
    let by_depth = dz > MIN_VISIBLE_DEPTH && dz < MAX_VISIBLE_DEPTH;
    let by_side = dx > MIN_VISIBLE_SIDE_DX;
    by_depth || by_side
}

/// Places both earrings for one frame.
///
/// Returns `None` for anything that is not a full face mesh with every
/// earring anchor. A side whose ear is hidden is reported as
/// [`SlotUpdate::Hide`].
/// Earring height is `width * aspect_ratio` of the artwork.
pub fn place_live_earrings(
    landmarks: &LandmarkSet,
    viewport: &impl Viewport,
    aspect_ratio: f64,
) -> Option<EarringPlacement> {
    if !JewelryKind::Earrings.accepts(landmarks) {
        return None;
    }

    let width = earring_width(
        viewport.display_distance(&landmarks[LEFT_TRAGUS], &landmarks[RIGHT_TRAGUS]),
    );
    let height = width * aspect_ratio;
    let nose = &landmarks[NOSE_TIP];

    let place_side = |side: EarSide| -> SlotUpdate {
        match estimate_earlobe(landmarks, side) {
            Some(lobe) if is_ear_visible(&lobe, nose) => {
                let display = viewport.display_size();
                let pos = viewport.to_display(&lobe);
                let nudge = side.outward() * EARRING_HORIZONTAL_NUDGE;
                let left = clamp_lenient(pos.x - width / 2.0 + nudge, 0.0, display.width - width);
                let top = clamp_lenient(pos.y - height / 2.0, 0.0, display.height - height);
                SlotUpdate::Show(OverlayPlacement::rect(left, top, width, height))
            }
            _ => SlotUpdate::Hide,
        }
    };

    Some(EarringPlacement {
        width,
        left: place_side(EarSide::Left),
        right: place_side(EarSide::Right),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::domain::viewport::FillViewport;
    use crate::shared::geometry::Size;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn viewport() -> FillViewport {
        FillViewport::new(Size::new(640.0, 480.0))
    }

    fn mesh_with(points: &[(usize, Landmark)]) -> LandmarkSet {
        let mut pts = vec![Landmark::default(); 468];
        for &(i, p) in points {
            pts[i] = p;
        }
        LandmarkSet::new(pts)
    }

    /// Slightly turned face: left tragus 0.05 from the nose, right 0.25.
    fn turned_face() -> LandmarkSet {
        mesh_with(&[
            (NOSE_TIP, Landmark::new(0.5, 0.45, 0.0)),
            (LEFT_TRAGUS, Landmark::new(0.45, 0.4, 0.0)),
            (LEFT_HELIX_TOP, Landmark::new(0.45, 0.3, 0.0)),
            (LEFT_JAW_CORNER, Landmark::new(0.45, 0.5, 0.0)),
            (RIGHT_TRAGUS, Landmark::new(0.75, 0.4, 0.0)),
            (RIGHT_HELIX_TOP, Landmark::new(0.75, 0.3, 0.0)),
            (RIGHT_JAW_CORNER, Landmark::new(0.75, 0.5, 0.0)),
        ])
    }

    #[test]
    fn test_earring_width_from_jaw_span() {
        // 0.4 * 640 / 6
        assert_relative_eq!(earring_width(256.0), 256.0 / 6.0);
        assert_relative_eq!(earring_width(256.0), 42.666_666, epsilon = 1e-5);
    }

    #[test]
    fn test_earring_width_capped() {
        assert_relative_eq!(earring_width(360.0), 60.0);
        assert_relative_eq!(earring_width(10_000.0), 60.0);
    }

    #[test]
    fn test_earring_width_monotone_below_cap() {
        let mut prev = 0.0;
        for span in (0..400).map(|s| s as f64) {
            let w = earring_width(span);
            assert!(w >= prev);
            prev = w;
        }
    }

    #[test]
    fn test_estimate_earlobe_blends_front_and_side() {
        let lobe = estimate_earlobe(&turned_face(), EarSide::Left).unwrap();
        // blend = 0.05 / 0.25 = 0.2
        // front = (0.45, 0.515), side = (0.45 - 0.035, 0.48)
        assert_relative_eq!(lobe.x, 0.45 * 0.8 + 0.415 * 0.2, epsilon = 1e-12);
        assert_relative_eq!(lobe.y, 0.515 * 0.8 + 0.48 * 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_earlobe_full_profile_uses_side_model() {
        let lobe = estimate_earlobe(&turned_face(), EarSide::Right).unwrap();
        // |0.75 - 0.5| / 0.25 = 1 -> side model only, pushed outward (+x)
        assert_relative_eq!(lobe.x, 0.75 + 0.1 * 0.35, epsilon = 1e-12);
        assert_relative_eq!(lobe.y, 0.4 + 0.1 * 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_estimate_earlobe_takes_jaw_corner_depth() {
        let mut face = turned_face().points().to_vec();
        face[LEFT_JAW_CORNER].z = -22.0;
        let lobe = estimate_earlobe(&LandmarkSet::new(face), EarSide::Left).unwrap();
        assert_relative_eq!(lobe.z, -22.0);
    }

    #[rstest]
    #[case::depth_only(Landmark::new(0.5, 0.5, 20.0), true)]
    #[case::side_only(Landmark::new(0.55, 0.5, 0.0), true)]
    #[case::both(Landmark::new(0.6, 0.5, 30.0), true)]
    #[case::too_deep_and_centered(Landmark::new(0.51, 0.5, 60.0), false)]
    #[case::shallow_and_centered(Landmark::new(0.52, 0.5, 10.0), false)]
    #[case::depth_boundary_excluded(Landmark::new(0.5, 0.5, 15.0), false)]
    fn test_is_ear_visible(#[case] ear: Landmark, #[case] expected: bool) {
        let nose = Landmark::new(0.5, 0.5, 0.0);
        assert_eq!(is_ear_visible(&ear, &nose), expected);
    }

    #[test]
    fn test_width_end_to_end() {
        let face = mesh_with(&[
            (LEFT_TRAGUS, Landmark::flat(0.3, 0.5)),
            (RIGHT_TRAGUS, Landmark::flat(0.7, 0.5)),
        ]);
        let placement = place_live_earrings(&face, &viewport(), 1.0).unwrap();
        assert_relative_eq!(placement.width, 0.4 * 640.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_places_visible_left_earring() {
        let placement = place_live_earrings(&turned_face(), &viewport(), 1.5).unwrap();
        let SlotUpdate::Show(left) = placement.left else {
            panic!("left earring should be shown");
        };
        let lobe = estimate_earlobe(&turned_face(), EarSide::Left).unwrap();
        let w = placement.width;
        assert_relative_eq!(left.width, w);
        assert_eq!(left.height, Some(w * 1.5));
        assert_relative_eq!(left.left, lobe.x * 640.0 - w / 2.0 - 3.2, epsilon = 1e-9);
        assert_relative_eq!(left.top, lobe.y * 480.0 - w * 1.5 / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hides_ear_close_to_nose() {
        // Left ear sits on the nose with no depth contrast.
        let face = mesh_with(&[
            (NOSE_TIP, Landmark::new(0.5, 0.45, 0.0)),
            (LEFT_TRAGUS, Landmark::new(0.5, 0.45, 0.0)),
            (LEFT_HELIX_TOP, Landmark::new(0.5, 0.45, 0.0)),
            (LEFT_JAW_CORNER, Landmark::new(0.5, 0.45, 0.0)),
        ]);
        let placement = place_live_earrings(&face, &viewport(), 1.0).unwrap();
        assert_eq!(placement.left, SlotUpdate::Hide);
    }

    #[test]
    fn test_clamps_inside_viewport() {
        let face = mesh_with(&[
            (NOSE_TIP, Landmark::new(0.5, 0.5, 0.0)),
            (LEFT_TRAGUS, Landmark::new(0.0, 0.99, 0.0)),
            (LEFT_HELIX_TOP, Landmark::new(0.0, 0.9, 0.0)),
            (LEFT_JAW_CORNER, Landmark::new(0.0, 1.0, 0.0)),
            (RIGHT_TRAGUS, Landmark::new(1.0, 0.99, 0.0)),
            (RIGHT_HELIX_TOP, Landmark::new(1.0, 0.9, 0.0)),
            (RIGHT_JAW_CORNER, Landmark::new(1.0, 1.0, 0.0)),
        ]);
        let placement = place_live_earrings(&face, &viewport(), 1.0).unwrap();
        let w = placement.width;
        let (SlotUpdate::Show(left), SlotUpdate::Show(right)) = (placement.left, placement.right)
        else {
            panic!("both earrings should be shown");
        };
        assert_relative_eq!(left.left, 0.0);
        assert_relative_eq!(left.top, 480.0 - w);
        assert_relative_eq!(right.left, 640.0 - w);
        assert_relative_eq!(right.top, 480.0 - w);
    }

    #[test]
    fn test_coincident_tragi_give_zero_width() {
        let face = LandmarkSet::new(vec![Landmark::flat(0.2, 0.2); 478]);
        let placement = place_live_earrings(&face, &viewport(), 1.0).unwrap();
        assert_relative_eq!(placement.width, 0.0);
    }

    #[test]
    fn test_truncated_mesh_is_ignored() {
        let truncated = LandmarkSet::new(vec![Landmark::default(); 300]);
        assert!(place_live_earrings(&truncated, &viewport(), 1.0).is_none());
    }

    #[test]
    fn test_one_point_short_of_mesh_is_ignored() {
        let mut pts = turned_face().points().to_vec();
        pts.pop();
        assert!(place_live_earrings(&LandmarkSet::new(pts), &viewport(), 1.0).is_none());
    }

    #[test]
    fn test_rejects_non_mesh() {
        let hand = LandmarkSet::new(vec![Landmark::default(); 21]);
        assert!(place_live_earrings(&hand, &viewport(), 1.0).is_none());
    }
}
