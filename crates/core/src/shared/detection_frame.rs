use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::hand::Hand;

/// Opaque reference to a captured frame.
///
/// The pipeline never looks at pixels; it only carries the handle through
/// to the detector and the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle {
    pub index: usize,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl ImageHandle {
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
        }
    }
}

/// Handedness exactly as the detector reported it (mirrored capture).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawHandedness {
    pub label: String,
    pub score: f64,
}

impl RawHandedness {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Which landmark collection gets published.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameOfReference {
    #[default]
    Image,
    World,
}

impl FrameOfReference {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameOfReference::Image => "image",
            FrameOfReference::World => "world",
        }
    }
}

impl fmt::Display for FrameOfReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameOfReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(FrameOfReference::Image),
            "world" => Ok(FrameOfReference::World),
            other => Err(format!(
                "frame of reference must be 'image' or 'world', got '{other}'"
            )),
        }
    }
}

/// Raw per-frame detector output.
///
/// Each collection is optional because detectors omit them entirely when
/// nothing was found. When present, image-space hands, world-space hands
/// and handedness are index-aligned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionFrame {
    #[serde(default)]
    pub image: ImageHandle,
    #[serde(default, alias = "multiHandLandmarks")]
    pub image_landmarks: Option<Vec<Hand>>,
    #[serde(default, alias = "multiHandWorldLandmarks")]
    pub world_landmarks: Option<Vec<Hand>>,
    #[serde(default, alias = "multiHandedness")]
    pub handedness: Option<Vec<RawHandedness>>,
}

impl DetectionFrame {
    pub fn empty(image: ImageHandle) -> Self {
        Self {
            image,
            ..Self::default()
        }
    }

    /// Landmark collection for the given frame of reference.
    pub fn landmarks(&self, frame_of_reference: FrameOfReference) -> Option<&[Hand]> {
        match frame_of_reference {
            FrameOfReference::Image => self.image_landmarks.as_deref(),
            FrameOfReference::World => self.world_landmarks.as_deref(),
        }
    }

    /// Keeps at most `max_hands` entries in every collection, preserving
    /// alignment.
    pub fn truncated(mut self, max_hands: usize) -> Self {
        for hands in [&mut self.image_landmarks, &mut self.world_landmarks]
            .into_iter()
            .flatten()
        {
            hands.truncate(max_hands);
        }
        if let Some(handedness) = self.handedness.as_mut() {
            handedness.truncate(max_hands);
        }
        self
    }
}
