use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::capture::domain::frame_source::FrameSource;
use crate::capture::domain::hand_detector::HandDetector;
use crate::overlay::domain::overlay_sink::OverlaySink;
use crate::shared::detection_frame::ImageHandle;
use crate::shared::error::PipelineError;
use crate::sync::domain::reactive_model::{change_event, keys};
use crate::sync::domain::sync_channel::SyncChannel;

use super::config_snapshot::ConfigSnapshot;
use super::pipeline_logger::PipelineLogger;
use super::process_frame_use_case::{FrameOutcome, ProcessFrameUseCase};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Active,
}

/// Live configuration update, queued by model subscriptions and applied by
/// the frame loop before the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigChange {
    Width,
    Height,
    Debug,
}

impl ConfigChange {
    fn key(self) -> &'static str {
        match self {
            Self::Width => keys::WIDTH,
            Self::Height => keys::HEIGHT,
            Self::Debug => keys::DEBUG,
        }
    }
}

/// Asks a running frame loop to return before its next frame.
#[derive(Clone, Debug)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }
}

/// Counters for one `run`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames received from the source.
    pub frames: usize,
    /// Frames whose tracking state reached the model.
    pub published: usize,
    /// Frames dropped because detection failed or was malformed.
    pub skipped: usize,
    /// Frames whose publish was refused by the model.
    pub sink_failures: usize,
}

/// Owns the frame source, the detector and the publish path, and is the
/// only writer of `camera_active`.
///
/// `Stopped -> Starting -> Active -> Stopped`. Teardown (`stop`) never
/// fails, may be called from any state, and runs on drop.
pub struct LifecycleController {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    channel: SyncChannel,
    overlay: Box<dyn OverlaySink>,
    logger: Box<dyn PipelineLogger>,
    processor: ProcessFrameUseCase,
    state: LifecycleState,
    frames: Option<Receiver<ImageHandle>>,
    changes: Receiver<ConfigChange>,
    stop_requested: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl LifecycleController {
    /// Subscribes to width, height and debug changes on the channel's model
    /// so they can be applied while capture is running.
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        mut channel: SyncChannel,
        overlay: Box<dyn OverlaySink>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        let (tx, changes) = crossbeam_channel::unbounded();
        for change in [ConfigChange::Width, ConfigChange::Height, ConfigChange::Debug] {
            subscribe_change(&mut channel, change, tx.clone());
        }

        Self {
            source,
            detector,
            channel,
            overlay,
            logger,
            processor: ProcessFrameUseCase::new(ConfigSnapshot::default()),
            state: LifecycleState::Stopped,
            frames: None,
            changes,
            stop_requested: Arc::new(AtomicBool::new(false)),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// How long the frame loop waits for a frame before re-checking for a
    /// stop request.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn channel(&self) -> &SyncChannel {
        &self.channel
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            requested: self.stop_requested.clone(),
        }
    }

    /// Configures the detector, starts capture and publishes
    /// `camera_active = true`.
    ///
    /// An invalid configuration fails before anything is acquired. If the
    /// detector or the frame source cannot be acquired, the partial start
    /// is torn down (leaving `camera_active = false`) and
    /// `AcquisitionFailure` is returned.
    pub fn start(&mut self) -> Result<(), PipelineError> {
        if self.state == LifecycleState::Active {
            log::warn!("Capture already active, ignoring start");
            return Ok(());
        }

        let config = ConfigSnapshot::read(self.channel.model())?;
        self.transition(LifecycleState::Starting);

        if let Err(e) = self.detector.configure(&config.detector_options()) {
            self.stop();
            return Err(PipelineError::AcquisitionFailure(format!(
                "detector rejected options: {e}"
            )));
        }

        let (tx, rx) = crossbeam_channel::bounded(0);
        if let Err(e) = self.source.start(config.capture_settings(), tx) {
            drop(rx);
            self.stop();
            return Err(PipelineError::AcquisitionFailure(e.to_string()));
        }
        self.frames = Some(rx);

        while self.changes.try_recv().is_ok() {}
        self.overlay.resize(config.width, config.height);
        self.overlay.set_debug_visible(config.debug);
        self.processor = ProcessFrameUseCase::new(config);
        self.stop_requested.store(false, Ordering::Relaxed);
        self.transition(LifecycleState::Active);

        if let Err(e) = self.channel.publish_camera_active(true) {
            log::warn!("Capture started but camera_active was not published: {e}");
        }
        Ok(())
    }

    /// Processes frames one at a time until the source runs dry or a stop
    /// is requested. Per-frame failures are counted, never returned.
    pub fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();
        let frames = match (&self.frames, self.state) {
            (Some(frames), LifecycleState::Active) => frames.clone(),
            _ => {
                log::warn!("Capture is not active, nothing to run");
                return summary;
            }
        };

        let stop = self.stop_handle();
        while !stop.is_stop_requested() {
            self.apply_config_changes();

            let image = match frames.recv_timeout(self.poll_interval) {
                Ok(image) => image,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    self.logger
                        .info(&format!("Frame source finished after {} frames", summary.frames));
                    break;
                }
            };
            summary.frames += 1;

            let detect_start = Instant::now();
            let detection = self.detector.detect(&image);
            self.logger.timing("detect", elapsed_ms(detect_start));

            let frame = match detection {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Detection failed on frame {}: {e}", image.index);
                    summary.skipped += 1;
                    self.logger.progress(summary.frames);
                    continue;
                }
            };
            let hands = frame.image_landmarks.as_ref().map_or(0, Vec::len);
            self.logger.metric("hands", hands as f64);

            let process_start = Instant::now();
            let outcome =
                self.processor
                    .execute(&frame, &mut self.channel, self.overlay.as_mut());
            self.logger.timing("process", elapsed_ms(process_start));

            match outcome {
                FrameOutcome::Published(_) => summary.published += 1,
                FrameOutcome::Skipped(_) => summary.skipped += 1,
                FrameOutcome::SinkFailed(_) => summary.sink_failures += 1,
            }
            self.logger.progress(summary.frames);
        }

        summary
    }

    /// Stops the frame source, then publishes `camera_active = false`.
    ///
    /// Errors from either step are logged and swallowed. Safe to call
    /// repeatedly and from a partial start.
    pub fn stop(&mut self) {
        self.frames = None;
        if let Err(e) = self.source.stop() {
            log::warn!("Frame source failed to stop cleanly: {e}");
        }
        if let Err(e) = self.channel.publish_camera_active(false) {
            log::warn!("camera_active = false was not published: {e}");
        }

        if self.state != LifecycleState::Stopped {
            let was_active = self.state == LifecycleState::Active;
            self.transition(LifecycleState::Stopped);
            if was_active {
                self.logger.summary();
            }
        }
    }

    fn apply_config_changes(&mut self) {
        let mut resize = false;
        let mut debug = false;
        for change in self.changes.try_iter() {
            log::debug!("Live update: {} changed", change.key());
            match change {
                ConfigChange::Width | ConfigChange::Height => resize = true,
                ConfigChange::Debug => debug = true,
            }
        }
        if !(resize || debug) {
            return;
        }

        let config = match ConfigSnapshot::read(self.channel.model()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring live update: {e}");
                return;
            }
        };
        if resize {
            self.overlay.resize(config.width, config.height);
        }
        if debug {
            self.overlay.set_debug_visible(config.debug);
        }
    }

    fn transition(&mut self, next: LifecycleState) {
        log::info!("Capture {:?} -> {next:?}", self.state);
        self.state = next;
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        if self.state != LifecycleState::Stopped {
            self.stop();
        }
    }
}

fn subscribe_change(channel: &mut SyncChannel, change: ConfigChange, tx: Sender<ConfigChange>) {
    channel.subscribe(
        &change_event(change.key()),
        Box::new(move || {
            // The controller may already be gone; a closed queue is fine.
            let _ = tx.send(change);
        }),
    );
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
