use thiserror::Error;

/// Failure kinds surfaced by the hand-tracking pipeline.
///
/// Port implementations report `Box<dyn Error>`; the pipeline maps those
/// into one of these kinds at its boundary. Detection and sink failures
/// cost one frame; configuration and acquisition failures abort `start`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid detection: {0}")]
    InvalidDetection(String),
    #[error("reactive model unavailable: {0}")]
    SinkUnavailable(String),
    #[error("failed to acquire frame source: {0}")]
    AcquisitionFailure(String),
}
