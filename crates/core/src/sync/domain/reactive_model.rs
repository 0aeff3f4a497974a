use serde_json::Value;

/// Keys shared with the external model.
pub mod keys {
    pub const FRAME_OF_REFERENCE: &str = "frame_of_reference";
    pub const MAX_NUM_HANDS: &str = "max_num_hands";
    pub const MODEL_COMPLEXITY: &str = "model_complexity";
    pub const MIN_DETECTION_CONFIDENCE: &str = "min_detection_confidence";
    pub const MIN_TRACKING_CONFIDENCE: &str = "min_tracking_confidence";
    pub const PRECISION: &str = "precision";
    pub const DEBUG: &str = "debug";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";

    pub const HANDS_DATA: &str = "hands_data";
    pub const HANDEDNESS: &str = "handedness";
    pub const IS_TRACKING: &str = "is_tracking";
    pub const CAMERA_ACTIVE: &str = "camera_active";
}

/// Name of the event fired when `key` changes in a flushed batch.
pub fn change_event(key: &str) -> String {
    format!("change:{key}")
}

pub type ChangeHandler = Box<dyn Fn() + Send + Sync>;

/// External observable model the pipeline publishes into.
///
/// Updates are staged with `set` and become visible to observers together
/// on `flush`; observers never see half of a batch. A failed flush discards
/// the staged batch.
pub trait ReactiveModel: Send {
    /// Current value of `key`, including staged but unflushed updates.
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value);

    /// Publishes every staged update at once and notifies subscribers.
    fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Registers `handler` for `event` (see [`change_event`]).
    fn subscribe(&mut self, event: &str, handler: ChangeHandler);
}
