use crate::shared::detection_frame::DetectionFrame;
use crate::tracking::domain::debug_summary::DebugSummary;

/// Presentation-side consumer of raw detections.
///
/// Receives the untransformed frame every time one is processed; nothing
/// it does feeds back into the published state.
pub trait OverlaySink: Send {
    /// Draws `frame`. Landmarks and `summary` are only shown when `debug`
    /// is on.
    fn render(
        &mut self,
        frame: &DetectionFrame,
        debug: bool,
        summary: &DebugSummary,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Live canvas resize; no restart required.
    fn resize(&mut self, width: u32, height: u32);

    fn set_debug_visible(&mut self, visible: bool);
}
