use crate::overlay::domain::overlay_sink::OverlaySink;
use crate::shared::detection_frame::DetectionFrame;
use crate::tracking::domain::debug_summary::DebugSummary;

/// Headless overlay: emits the debug summary through the `log` crate
/// instead of drawing.
///
/// Summaries are logged at debug level, and only when they change, to
/// keep steady tracking from flooding the log.
pub struct LogOverlay {
    width: u32,
    height: u32,
    debug_visible: bool,
    last_summary: Option<String>,
    frames_rendered: usize,
}

impl LogOverlay {
    pub fn new(width: u32, height: u32, debug_visible: bool) -> Self {
        Self {
            width,
            height,
            debug_visible,
            last_summary: None,
            frames_rendered: 0,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn debug_visible(&self) -> bool {
        self.debug_visible
    }

    pub fn last_summary(&self) -> Option<&str> {
        self.last_summary.as_deref()
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames_rendered
    }
}

impl OverlaySink for LogOverlay {
    fn render(
        &mut self,
        frame: &DetectionFrame,
        debug: bool,
        summary: &DebugSummary,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.frames_rendered += 1;
        if !(debug && self.debug_visible) {
            return Ok(());
        }

        let text = summary.to_string();
        if self.last_summary.as_deref() != Some(text.as_str()) {
            let hands = frame.image_landmarks.as_ref().map_or(0, Vec::len);
            log::debug!(
                "[{}x{}] frame {}: {text} ({hands} hands drawn)",
                self.width,
                self.height,
                frame.image.index
            );
            self.last_summary = Some(text);
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn set_debug_visible(&mut self, visible: bool) {
        self.debug_visible = visible;
    }
}

/// Overlay that ignores everything.
pub struct NullOverlay;

impl OverlaySink for NullOverlay {
    fn render(
        &mut self,
        _frame: &DetectionFrame,
        _debug: bool,
        _summary: &DebugSummary,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn resize(&mut self, _width: u32, _height: u32) {}

    fn set_debug_visible(&mut self, _visible: bool) {}
}
