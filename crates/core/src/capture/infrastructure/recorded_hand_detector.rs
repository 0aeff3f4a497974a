use std::collections::HashMap;
use std::sync::Arc;

use crate::capture::domain::hand_detector::{DetectorOptions, HandDetector};
use crate::shared::constants::DEFAULT_MAX_NUM_HANDS;
use crate::shared::detection_frame::{DetectionFrame, ImageHandle};

/// Replays pre-recorded detector output by frame index.
///
/// Frames missing from the recording come back empty. The configured
/// `max_num_hands` is honoured by dropping extra hands, as a live detector
/// would never report them.
pub struct RecordedHandDetector {
    frames: Arc<HashMap<usize, DetectionFrame>>,
    max_num_hands: usize,
}

impl RecordedHandDetector {
    pub fn new(frames: Arc<HashMap<usize, DetectionFrame>>) -> Self {
        Self {
            frames,
            max_num_hands: DEFAULT_MAX_NUM_HANDS as usize,
        }
    }

    /// Keys each frame by its `image.index`.
    pub fn from_recording(recording: Vec<DetectionFrame>) -> Self {
        let frames = recording
            .into_iter()
            .map(|frame| (frame.image.index, frame))
            .collect();
        Self::new(Arc::new(frames))
    }
}

impl HandDetector for RecordedHandDetector {
    fn configure(&mut self, options: &DetectorOptions) -> Result<(), Box<dyn std::error::Error>> {
        if options.max_num_hands == 0 {
            return Err("max_num_hands must be at least 1".into());
        }
        self.max_num_hands = options.max_num_hands as usize;
        Ok(())
    }

    fn detect(&mut self, image: &ImageHandle) -> Result<DetectionFrame, Box<dyn std::error::Error>> {
        let frame = match self.frames.get(&image.index) {
            Some(recorded) => DetectionFrame {
                image: *image,
                ..recorded.clone()
            },
            None => DetectionFrame::empty(*image),
        };
        Ok(frame.truncated(self.max_num_hands))
    }
}
