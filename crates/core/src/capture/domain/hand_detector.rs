use crate::shared::detection_frame::{DetectionFrame, ImageHandle};

/// Options handed to the detector when capture starts.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorOptions {
    pub max_num_hands: u32,
    pub model_complexity: f64,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
}

/// Domain interface for hand-landmark detection.
///
/// The pipeline treats the detector as a black box: it hands over an image
/// and gets raw landmarks and handedness back. Implementations may keep
/// tracking state across frames, hence `&mut self`.
pub trait HandDetector: Send {
    fn configure(&mut self, options: &DetectorOptions) -> Result<(), Box<dyn std::error::Error>>;

    fn detect(&mut self, image: &ImageHandle) -> Result<DetectionFrame, Box<dyn std::error::Error>>;
}
