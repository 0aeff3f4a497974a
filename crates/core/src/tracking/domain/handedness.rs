use serde::{Deserialize, Serialize};

use crate::shared::detection_frame::RawHandedness;

/// Anatomical handedness as published: `(label, score)`.
///
/// Serializes as a two-element array, matching the `handedness` wire shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Handedness(pub String, pub f64);

impl Handedness {
    /// Corrects the detector's mirrored label; the score is kept as-is.
    pub fn from_raw(raw: &RawHandedness) -> Self {
        Self(normalize_label(&raw.label).to_string(), raw.score)
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn score(&self) -> f64 {
        self.1
    }
}

/// Swaps `Left`/`Right`: the detector labels the mirrored (selfie) image,
/// so its left is the subject's right. Anything else passes through.
pub fn normalize_label(label: &str) -> &str {
    match label {
        "Left" => "Right",
        "Right" => "Left",
        other => other,
    }
}
