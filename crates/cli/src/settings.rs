use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use handwave_core::pipeline::config_snapshot::ConfigSnapshot;
use handwave_core::shared::constants::{
    DEFAULT_DEBUG, DEFAULT_HEIGHT, DEFAULT_MAX_NUM_HANDS, DEFAULT_MIN_DETECTION_CONFIDENCE,
    DEFAULT_MIN_TRACKING_CONFIDENCE, DEFAULT_MODEL_COMPLEXITY, DEFAULT_PRECISION, DEFAULT_WIDTH,
};
use handwave_core::shared::detection_frame::FrameOfReference;
use handwave_core::shared::error::PipelineError;
use handwave_core::tracking::domain::precision::Precision;

/// Persisted defaults for a replay session. Missing fields fall back to
/// the built-in defaults, so a settings file may list only what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub frame_of_reference: FrameOfReference,
    pub max_num_hands: u32,
    pub model_complexity: f64,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
    pub precision: u32,
    pub debug: bool,
    pub width: u32,
    pub height: u32,
    /// Replay pace; 0 replays as fast as frames are consumed.
    pub fps: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_of_reference: FrameOfReference::Image,
            max_num_hands: DEFAULT_MAX_NUM_HANDS,
            model_complexity: DEFAULT_MODEL_COMPLEXITY,
            min_detection_confidence: DEFAULT_MIN_DETECTION_CONFIDENCE,
            min_tracking_confidence: DEFAULT_MIN_TRACKING_CONFIDENCE,
            precision: DEFAULT_PRECISION,
            debug: DEFAULT_DEBUG,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: 0.0,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Handwave").join("settings.json"))
    }

    /// Loads the per-user settings file, or defaults if it is missing or
    /// unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Loads an explicitly requested settings file. Unlike [`Settings::load`]
    /// a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read settings {}: {e}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .map_err(|e| format!("Invalid settings {}: {e}", path.display()))?;
        Ok(settings)
    }

    pub fn to_snapshot(&self) -> Result<ConfigSnapshot, PipelineError> {
        let snapshot = ConfigSnapshot {
            frame_of_reference: self.frame_of_reference,
            max_num_hands: self.max_num_hands,
            model_complexity: self.model_complexity,
            min_detection_confidence: self.min_detection_confidence,
            min_tracking_confidence: self.min_tracking_confidence,
            precision: Precision::new(i64::from(self.precision))?,
            debug: self.debug,
            width: self.width,
            height: self.height,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_settings(r#"{"frame_of_reference": "world", "precision": 5}"#);

        let settings = Settings::load_from(file.path()).unwrap();

        assert_eq!(settings.frame_of_reference, FrameOfReference::World);
        assert_eq!(settings.precision, 5);
        assert_eq!(settings.width, 640);
        assert!(settings.debug);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let file = write_settings("{ precision: ");
        let err = Settings::load_from(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid settings"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Settings::load_from(Path::new("/nonexistent/handwave.json")).unwrap_err();
        assert!(err.to_string().starts_with("Cannot read settings"));
    }

    #[test]
    fn test_defaults_make_valid_snapshot() {
        let snapshot = Settings::default().to_snapshot().unwrap();
        assert_eq!(snapshot, ConfigSnapshot::default());
    }

    #[test]
    fn test_out_of_range_precision_rejected() {
        let settings = Settings {
            precision: 101,
            ..Settings::default()
        };
        assert!(matches!(
            settings.to_snapshot(),
            Err(PipelineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_hands_rejected() {
        let settings = Settings {
            max_num_hands: 0,
            ..Settings::default()
        };
        assert!(settings.to_snapshot().is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let settings = Settings {
            fps: 30.0,
            debug: false,
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let file = write_settings(&json);
        assert_eq!(Settings::load_from(file.path()).unwrap(), settings);
    }
}
