use crate::shared::detection_frame::{DetectionFrame, FrameOfReference};
use crate::shared::error::PipelineError;

use super::columnar_hand::ColumnarHand;
use super::handedness::Handedness;
use super::precision::{Precision, Round};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingPhase {
    NoHands,
    Tracking,
}

/// Published tracking state for one frame.
///
/// `hands` and `handedness` are `None` (not empty) when nothing is tracked,
/// so consumers can tell "no hands this frame" from "never initialized".
/// `is_tracking` is derived from `hands`, never stored separately.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackingState {
    hands: Option<Vec<ColumnarHand>>,
    handedness: Option<Vec<Handedness>>,
}

impl TrackingState {
    pub fn no_hands() -> Self {
        Self::default()
    }

    /// Derives the state for `frame`, selecting landmarks by
    /// `frame_of_reference` and rounding them to `precision`.
    ///
    /// Fails with `InvalidDetection` when a hand is malformed or the
    /// detector's collections are not index-aligned.
    pub fn derive(
        frame: &DetectionFrame,
        frame_of_reference: FrameOfReference,
        precision: Precision,
    ) -> Result<Self, PipelineError> {
        if let (Some(image), Some(world)) = (&frame.image_landmarks, &frame.world_landmarks) {
            if image.len() != world.len() {
                return Err(PipelineError::InvalidDetection(format!(
                    "{} image-space hands but {} world-space hands",
                    image.len(),
                    world.len()
                )));
            }
        }

        let selected = match frame.landmarks(frame_of_reference) {
            Some(hands) if !hands.is_empty() => hands,
            _ => return Ok(Self::no_hands()),
        };

        if let Some(handedness) = &frame.handedness {
            if handedness.len() != selected.len() {
                return Err(PipelineError::InvalidDetection(format!(
                    "{} hands but {} handedness entries",
                    selected.len(),
                    handedness.len()
                )));
            }
        }

        let hands = selected
            .iter()
            .map(|hand| ColumnarHand::from_hand(&hand.rounded(precision)))
            .collect::<Result<Vec<_>, _>>()?;
        let handedness = frame
            .handedness
            .as_ref()
            .map(|entries| entries.iter().map(Handedness::from_raw).collect());

        Ok(Self {
            hands: Some(hands),
            handedness,
        })
    }

    pub fn is_tracking(&self) -> bool {
        self.hands.as_ref().is_some_and(|hands| !hands.is_empty())
    }

    pub fn phase(&self) -> TrackingPhase {
        if self.is_tracking() {
            TrackingPhase::Tracking
        } else {
            TrackingPhase::NoHands
        }
    }

    pub fn hands(&self) -> Option<&[ColumnarHand]> {
        self.hands.as_deref()
    }

    pub fn handedness(&self) -> Option<&[Handedness]> {
        self.handedness.as_deref()
    }
}

/// Phase change produced by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: TrackingPhase,
    pub to: TrackingPhase,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Holds the current tracking state and replaces it wholesale each frame.
///
/// No hysteresis: every frame is judged on its own detections.
pub struct TrackingStateMachine {
    current: TrackingState,
}

impl TrackingStateMachine {
    pub fn new() -> Self {
        Self {
            current: TrackingState::no_hands(),
        }
    }

    pub fn current(&self) -> &TrackingState {
        &self.current
    }

    pub fn phase(&self) -> TrackingPhase {
        self.current.phase()
    }

    /// On error the current state is left as it was.
    pub fn advance(
        &mut self,
        frame: &DetectionFrame,
        frame_of_reference: FrameOfReference,
        precision: Precision,
    ) -> Result<Transition, PipelineError> {
        let next = TrackingState::derive(frame, frame_of_reference, precision)?;
        let transition = Transition {
            from: self.current.phase(),
            to: next.phase(),
        };
        self.current = next;
        Ok(transition)
    }
}

impl Default for TrackingStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
