use serde_json::Value;

use crate::capture::domain::frame_source::CaptureSettings;
use crate::capture::domain::hand_detector::DetectorOptions;
use crate::shared::constants::{
    DEFAULT_DEBUG, DEFAULT_HEIGHT, DEFAULT_MAX_NUM_HANDS, DEFAULT_MIN_DETECTION_CONFIDENCE,
    DEFAULT_MIN_TRACKING_CONFIDENCE, DEFAULT_MODEL_COMPLEXITY, DEFAULT_WIDTH,
};
use crate::shared::detection_frame::FrameOfReference;
use crate::shared::error::PipelineError;
use crate::sync::domain::reactive_model::{keys, ReactiveModel};
use crate::tracking::domain::precision::Precision;

/// Validated, immutable view of the configuration keys, read once at the
/// start of each frame. Keys missing from the model take their defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigSnapshot {
    pub frame_of_reference: FrameOfReference,
    pub max_num_hands: u32,
    pub model_complexity: f64,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
    pub precision: Precision,
    pub debug: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            frame_of_reference: FrameOfReference::Image,
            max_num_hands: DEFAULT_MAX_NUM_HANDS,
            model_complexity: DEFAULT_MODEL_COMPLEXITY,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_MIN_TRACKING_CONFIDENCE,
            precision: Precision::default(),
            debug: DEFAULT_DEBUG,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ConfigSnapshot {
    pub fn read(model: &dyn ReactiveModel) -> Result<Self, PipelineError> {
        let defaults = Self::default();

        let frame_of_reference = match model.get(keys::FRAME_OF_REFERENCE) {
            None => defaults.frame_of_reference,
            Some(Value::String(s)) => s.parse().map_err(PipelineError::InvalidConfiguration)?,
            Some(other) => return Err(type_error(keys::FRAME_OF_REFERENCE, "a string", &other)),
        };
        let precision = match model.get(keys::PRECISION) {
            None => defaults.precision,
            Some(value) => Precision::new(as_i64(keys::PRECISION, &value)?)?,
        };

        let snapshot = Self {
            frame_of_reference,
            max_num_hands: read_u32(model, keys::MAX_NUM_HANDS, defaults.max_num_hands)?,
            model_complexity: read_f64(model, keys::MODEL_COMPLEXITY, defaults.model_complexity)?,
            min_detection_confidence: read_f64(
                model,
                keys::MIN_DETECTION_CONFIDENCE,
                defaults.min_detection_confidence,
            )?,
            min_tracking_confidence: read_f64(
                model,
                keys::MIN_TRACKING_CONFIDENCE,
                defaults.min_tracking_confidence,
            )?,
            precision,
            debug: read_bool(model, keys::DEBUG, defaults.debug)?,
            width: read_u32(model, keys::WIDTH, defaults.width)?,
            height: read_u32(model, keys::HEIGHT, defaults.height)?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_num_hands == 0 {
            return Err(invalid("max_num_hands must be at least 1, got 0".into()));
        }
        if self.model_complexity.is_nan() || self.model_complexity < 0.0 {
            return Err(invalid(format!(
                "model_complexity must be >= 0, got {}",
                self.model_complexity
            )));
        }
        for (key, value) in [
            (keys::MIN_DETECTION_CONFIDENCE, self.min_detection_confidence),
            (keys::MIN_TRACKING_CONFIDENCE, self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!(
                    "{key} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn detector_options(&self) -> DetectorOptions {
        DetectorOptions {
            max_num_hands: self.max_num_hands,
            model_complexity: self.model_complexity,
            min_detection_confidence: self.min_detection_confidence,
            min_tracking_confidence: self.min_tracking_confidence,
        }
    }

    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            width: self.width,
            height: self.height,
        }
    }

    /// Model entries for every configuration key, used to seed a model.
    pub fn to_entries(&self) -> Vec<(String, Value)> {
        vec![
            (
                keys::FRAME_OF_REFERENCE.into(),
                Value::from(self.frame_of_reference.as_str()),
            ),
            (keys::MAX_NUM_HANDS.into(), Value::from(self.max_num_hands)),
            (keys::MODEL_COMPLEXITY.into(), Value::from(self.model_complexity)),
            (
                keys::MIN_DETECTION_CONFIDENCE.into(),
                Value::from(self.min_detection_confidence),
            ),
            (
                keys::MIN_TRACKING_CONFIDENCE.into(),
                Value::from(self.min_tracking_confidence),
            ),
            (keys::PRECISION.into(), Value::from(self.precision.digits())),
            (keys::DEBUG.into(), Value::from(self.debug)),
            (keys::WIDTH.into(), Value::from(self.width)),
            (keys::HEIGHT.into(), Value::from(self.height)),
        ]
    }
}

fn invalid(message: String) -> PipelineError {
    PipelineError::InvalidConfiguration(message)
}

fn type_error(key: &str, expected: &str, got: &Value) -> PipelineError {
    invalid(format!("{key} must be {expected}, got {got}"))
}

fn as_i64(key: &str, value: &Value) -> Result<i64, PipelineError> {
    value
        .as_i64()
        .ok_or_else(|| type_error(key, "an integer", value))
}

fn read_u32(model: &dyn ReactiveModel, key: &str, default: u32) -> Result<u32, PipelineError> {
    match model.get(key) {
        None => Ok(default),
        Some(value) => {
            let n = as_i64(key, &value)?;
            u32::try_from(n).map_err(|_| invalid(format!("{key} must be >= 0, got {n}")))
        }
    }
}

fn read_f64(model: &dyn ReactiveModel, key: &str, default: f64) -> Result<f64, PipelineError> {
    match model.get(key) {
        None => Ok(default),
        Some(value) => value.as_f64().ok_or_else(|| type_error(key, "a number", &value)),
    }
}

fn read_bool(model: &dyn ReactiveModel, key: &str, default: bool) -> Result<bool, PipelineError> {
    match model.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_bool()
            .ok_or_else(|| type_error(key, "a boolean", &value)),
    }
}
