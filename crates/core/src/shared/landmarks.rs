//! Normalized landmark points and fixed-index landmark sets.
//!
//! Index meaning is a contract with the external detection model: index 152
//! is always the chin of a face mesh, index 0 always the wrist of a hand.
//! Sets may be shorter than the model's full topology; lookups past the end
//! return `None` and callers treat that as a missing landmark.

use serde::{Deserialize, Serialize};

/// Face meshes come in two sizes: without and with refined iris points.
pub const FACE_MESH_SIZES: [usize; 2] = [468, 478];

/// A landmark with x/y normalized to [0, 1] of the source frame.
///
/// `z` is relative depth as reported by the model and is not normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn flat(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean distance in normalized x/y space (depth ignored).
    pub fn planar_distance(&self, other: &Landmark) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Both landmarks of a pair, or `None` if either is missing.
    pub fn pair(&self, a: usize, b: usize) -> Option<(&Landmark, &Landmark)> {
        Some((self.get(a)?, self.get(b)?))
    }

    /// True when the set has the point count of a full face mesh.
    pub fn is_face_mesh(&self) -> bool {
        FACE_MESH_SIZES.contains(&self.points.len())
    }

    pub fn has_all(&self, indices: &[usize]) -> bool {
        indices.iter().all(|&i| i < self.points.len())
    }
}

/// Panics past the end of the set. Check with [`LandmarkSet::has_all`] first.
impl std::ops::Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn set_of(n: usize) -> LandmarkSet {
        LandmarkSet::new(vec![Landmark::default(); n])
    }

    #[test]
    fn test_get_past_end_is_none() {
        let set = set_of(3);
        assert!(set.get(2).is_some());
        assert!(set.get(3).is_none());
    }

    #[test]
    fn test_pair_requires_both() {
        let set = set_of(10);
        assert!(set.pair(1, 9).is_some());
        assert!(set.pair(1, 10).is_none());
        assert!(set.pair(10, 1).is_none());
    }

    #[test]
    fn test_has_all() {
        let set = set_of(10);
        assert!(set.has_all(&[0, 9]));
        assert!(set.has_all(&[]));
        assert!(!set.has_all(&[3, 10]));
    }

    #[rstest]
    #[case::plain_mesh(468, true)]
    #[case::refined_mesh(478, true)]
    #[case::empty(0, false)]
    #[case::hand(21, false)]
    #[case::truncated(467, false)]
    fn test_is_face_mesh(#[case] len: usize, #[case] expected: bool) {
        assert_eq!(set_of(len).is_face_mesh(), expected);
    }

    #[test]
    fn test_planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 10.0);
        let b = Landmark::new(0.3, 0.4, -5.0);
        assert_relative_eq!(a.planar_distance(&b), 0.5);
    }

    #[test]
    fn test_deserializes_without_depth() {
        let set: LandmarkSet =
            serde_json::from_str(r#"[{"x":0.25,"y":0.5},{"x":0.1,"y":0.2,"z":-3.0}]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0), Some(&Landmark::flat(0.25, 0.5)));
        assert_relative_eq!(set.get(1).unwrap().z, -3.0);
    }
}
