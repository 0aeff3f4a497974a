use crossbeam_channel::Sender;

use crate::shared::detection_frame::ImageHandle;

/// Requested capture dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureSettings {
    pub width: u32,
    pub height: u32,
}

/// Camera-like producer of frames.
///
/// Implementations pace themselves: the pipeline takes one frame at a time
/// and the producer should not run ahead of it. The pipeline disconnects
/// the receiving end of `frames` before calling `stop`, so a producer
/// blocked on `send` observes the disconnect and can exit.
pub trait FrameSource: Send {
    /// Begins capture. Returns once frames can flow, or an error if the
    /// device could not be acquired.
    fn start(
        &mut self,
        settings: CaptureSettings,
        frames: Sender<ImageHandle>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Stops capture. Must tolerate being called when never started or
    /// already stopped.
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
