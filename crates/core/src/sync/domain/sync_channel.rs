use serde_json::Value;

use crate::shared::error::PipelineError;
use crate::tracking::domain::tracking_state::TrackingState;

use super::reactive_model::{keys, ChangeHandler, ReactiveModel};

/// Publishes derived state into the reactive model, one atomic batch per
/// call. No retries: a failed flush is reported as `SinkUnavailable`.
pub struct SyncChannel {
    model: Box<dyn ReactiveModel>,
}

impl SyncChannel {
    pub fn new(model: Box<dyn ReactiveModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn ReactiveModel {
        &*self.model
    }

    pub fn subscribe(&mut self, event: &str, handler: ChangeHandler) {
        self.model.subscribe(event, handler);
    }

    /// Stages `hands_data`, `handedness` and `is_tracking` together and
    /// flushes them as one update. Both hand fields use the serde shape
    /// that [`read_hands`](super::published_hands::read_hands) decodes.
    pub fn publish_tracking(&mut self, state: &TrackingState) -> Result<(), PipelineError> {
        let hands = encode(&state.hands())?;
        let handedness = encode(&state.handedness())?;
        self.model.set(keys::HANDS_DATA, hands);
        self.model.set(keys::HANDEDNESS, handedness);
        self.model
            .set(keys::IS_TRACKING, Value::Bool(state.is_tracking()));
        self.commit()
    }

    pub fn publish_camera_active(&mut self, active: bool) -> Result<(), PipelineError> {
        self.model.set(keys::CAMERA_ACTIVE, Value::Bool(active));
        self.commit()
    }

    fn commit(&mut self) -> Result<(), PipelineError> {
        self.model
            .flush()
            .map_err(|e| PipelineError::SinkUnavailable(e.to_string()))
    }
}

fn encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, PipelineError> {
    serde_json::to_value(value)
        .map_err(|e| PipelineError::InvalidDetection(format!("cannot encode tracking state: {e}")))
}
