use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::capture::domain::frame_source::{CaptureSettings, FrameSource};
use crate::shared::detection_frame::ImageHandle;

/// Emits handles for frames `0..frame_count` from a producer thread,
/// optionally paced to a fixed frame rate.
///
/// Stands in for a camera when replaying a recorded session.
pub struct ReplayFrameSource {
    frame_count: usize,
    interval: Option<Duration>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<usize>>,
}

impl ReplayFrameSource {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            interval: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Paces delivery to `fps` frames per second. Non-positive values
    /// disable pacing.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.interval = (fps > 0.0).then(|| Duration::from_secs_f64(1.0 / fps));
        self
    }
}

impl FrameSource for ReplayFrameSource {
    fn start(
        &mut self,
        settings: CaptureSettings,
        frames: Sender<ImageHandle>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.handle.is_some() {
            return Err("replay source already started".into());
        }

        self.cancelled = Arc::new(AtomicBool::new(false));
        let cancelled = self.cancelled.clone();
        let frame_count = self.frame_count;
        let interval = self.interval;

        let handle = std::thread::Builder::new()
            .name("replay-frame-source".into())
            .spawn(move || {
                let mut sent = 0;
                for index in 0..frame_count {
                    if cancelled.load(Ordering::Relaxed) {
                        break;
                    }
                    if let Some(interval) = interval {
                        std::thread::sleep(interval);
                    }
                    let image = ImageHandle::new(index, settings.width, settings.height);
                    if frames.send(image).is_err() {
                        break;
                    }
                    sent += 1;
                }
                sent
            })?;

        self.handle = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.cancelled.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let sent = handle
                .join()
                .map_err(|_| "replay source thread panicked")?;
            log::debug!("Replay source stopped after {sent} frames");
        }
        Ok(())
    }
}
