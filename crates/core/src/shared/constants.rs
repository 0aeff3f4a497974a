/// Landmarks per detected hand; index 0 is the wrist.
pub const HAND_LANDMARK_COUNT: usize = 21;

pub const DEFAULT_MAX_NUM_HANDS: u32 = 1;
pub const DEFAULT_MODEL_COMPLEXITY: f64 = 1.0;
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_PRECISION: u32 = 3;
pub const DEFAULT_DEBUG: bool = true;
pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

/// Upper bound on fractional digits accepted for coordinate rounding.
pub const MAX_PRECISION: u32 = 100;

/// Fractional digits shown in the textual debug summary.
pub const DEBUG_COORD_PRECISION: usize = 3;
