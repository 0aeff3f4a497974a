use std::fmt;

use crate::shared::constants::DEBUG_COORD_PRECISION;
use crate::shared::detection_frame::DetectionFrame;
use crate::shared::hand::Point3;

/// Text summary shown next to the overlay when debug is on.
///
/// Always derived from image-space landmarks, whatever frame of reference
/// is being published, so it lines up with what is drawn on screen.
#[derive(Clone, Debug, PartialEq)]
pub enum DebugSummary {
    NoHand,
    HandDetected { wrist: Point3 },
}

impl DebugSummary {
    pub fn from_frame(frame: &DetectionFrame) -> Self {
        frame
            .image_landmarks
            .as_deref()
            .and_then(|hands| hands.first())
            .and_then(|hand| hand.wrist())
            .map(|wrist| DebugSummary::HandDetected { wrist: *wrist })
            .unwrap_or(DebugSummary::NoHand)
    }
}

impl fmt::Display for DebugSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugSummary::NoHand => write!(f, "No hand detected"),
            DebugSummary::HandDetected { wrist } => write!(
                f,
                "Hand Detected | Wrist: x={}, y={}, z={}",
                signed_coord(wrist.x),
                signed_coord(wrist.y),
                signed_coord(wrist.z)
            ),
        }
    }
}

fn signed_coord(value: f64) -> String {
    // -0.0 would otherwise render as "+-0.000"
    let value = if value == 0.0 { 0.0 } else { value };
    let prefix = if value >= 0.0 { "+" } else { "" };
    format!(
        "{prefix}{value:.precision$}",
        precision = DEBUG_COORD_PRECISION
    )
}
