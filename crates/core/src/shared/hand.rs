//! Hand landmark geometry shared by every pipeline stage.
//!
//! Coordinates are either image space (x, y normalized to [0, 1] by frame
//! size, z relative depth anchored at the wrist) or world space (meters
//! around the estimated hand centroid). The types don't distinguish the two;
//! the detection frame does.

use serde::{Deserialize, Serialize};

use super::constants::HAND_LANDMARK_COUNT;

pub const WRIST: usize = 0;

/// Landmark names in detector index order.
pub const LANDMARK_NAMES: [&str; HAND_LANDMARK_COUNT] = [
    "WRIST",
    "THUMB_CMC",
    "THUMB_MCP",
    "THUMB_IP",
    "THUMB_TIP",
    "INDEX_FINGER_MCP",
    "INDEX_FINGER_PIP",
    "INDEX_FINGER_DIP",
    "INDEX_FINGER_TIP",
    "MIDDLE_FINGER_MCP",
    "MIDDLE_FINGER_PIP",
    "MIDDLE_FINGER_DIP",
    "MIDDLE_FINGER_TIP",
    "RING_FINGER_MCP",
    "RING_FINGER_PIP",
    "RING_FINGER_DIP",
    "RING_FINGER_TIP",
    "PINKY_MCP",
    "PINKY_PIP",
    "PINKY_DIP",
    "PINKY_TIP",
];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }
}

/// One detected hand as the detector reported it.
///
/// Well-formed hands carry exactly [`HAND_LANDMARK_COUNT`] points, but the
/// length is not enforced here: a malformed hand has to survive long enough
/// to be rejected as an invalid detection downstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    landmarks: Vec<Point3>,
}

impl Hand {
    pub fn new(landmarks: Vec<Point3>) -> Self {
        Self { landmarks }
    }

    pub fn landmarks(&self) -> &[Point3] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn wrist(&self) -> Option<&Point3> {
        self.landmarks.get(WRIST)
    }

    pub fn is_well_formed(&self) -> bool {
        self.landmarks.len() == HAND_LANDMARK_COUNT
    }
}
