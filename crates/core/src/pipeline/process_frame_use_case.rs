use crate::overlay::domain::overlay_sink::OverlaySink;
use crate::shared::detection_frame::DetectionFrame;
use crate::shared::error::PipelineError;
use crate::sync::domain::sync_channel::SyncChannel;
use crate::tracking::domain::debug_summary::DebugSummary;
use crate::tracking::domain::tracking_state::{
    TrackingPhase, TrackingState, TrackingStateMachine, Transition,
};

use super::config_snapshot::ConfigSnapshot;

/// What happened to one detector result.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// State derived and published.
    Published(Transition),
    /// Detector output was rejected; nothing was published.
    Skipped(PipelineError),
    /// State was derived but the reactive model refused the update.
    SinkFailed(PipelineError),
}

/// Runs one detector result through the transform and publish stages:
/// config snapshot, state derivation, publish, overlay.
///
/// Holds the only cross-frame state: the current tracking state and the
/// last configuration that validated.
pub struct ProcessFrameUseCase {
    machine: TrackingStateMachine,
    config: ConfigSnapshot,
}

impl ProcessFrameUseCase {
    pub fn new(config: ConfigSnapshot) -> Self {
        Self {
            machine: TrackingStateMachine::new(),
            config,
        }
    }

    pub fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    pub fn state(&self) -> &TrackingState {
        self.machine.current()
    }

    pub fn execute(
        &mut self,
        frame: &DetectionFrame,
        channel: &mut SyncChannel,
        overlay: &mut dyn OverlaySink,
    ) -> FrameOutcome {
        self.refresh_config(channel);
        let config = &self.config;

        let transition =
            match self
                .machine
                .advance(frame, config.frame_of_reference, config.precision)
            {
                Ok(transition) => transition,
                Err(e) => {
                    log::warn!("Skipping frame {}: {e}", frame.image.index);
                    render_overlay(frame, config.debug, overlay);
                    return FrameOutcome::Skipped(e);
                }
            };

        if transition.changed() {
            match transition.to {
                TrackingPhase::Tracking => {
                    log::info!("Tracking acquired at frame {}", frame.image.index)
                }
                TrackingPhase::NoHands => {
                    log::info!("Tracking lost at frame {}", frame.image.index)
                }
            }
        }

        let published = channel.publish_tracking(self.machine.current());
        render_overlay(frame, config.debug, overlay);

        match published {
            Ok(()) => FrameOutcome::Published(transition),
            Err(e) => {
                log::warn!("Publish failed for frame {}: {e}", frame.image.index);
                FrameOutcome::SinkFailed(e)
            }
        }
    }

    fn refresh_config(&mut self, channel: &SyncChannel) {
        match ConfigSnapshot::read(channel.model()) {
            Ok(snapshot) => self.config = snapshot,
            Err(e) => log::warn!("Keeping previous configuration: {e}"),
        }
    }
}

/// Every frame reaches the overlay, published or not.
fn render_overlay(frame: &DetectionFrame, debug: bool, overlay: &mut dyn OverlaySink) {
    let summary = DebugSummary::from_frame(frame);
    if let Err(e) = overlay.render(frame, debug, &summary) {
        log::warn!("Overlay render failed for frame {}: {e}", frame.image.index);
    }
}
