use std::collections::BTreeMap;
use std::time::Instant;

/// Cross-cutting sink for frame-loop instrumentation.
///
/// Keeps the lifecycle controller independent of where timings and counters
/// end up (log output, a host UI, or nowhere in tests).
pub trait PipelineLogger: Send {
    /// Report that `frames` frames have been handled since capture started.
    fn progress(&mut self, frames: usize);

    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. hands in frame).
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _frames: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Default)]
struct Series {
    count: usize,
    total: f64,
}

impl Series {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Aggregates per-stage timings and metrics and reports them through the
/// `log` crate.
///
/// A live session can run for hours, so only running totals are kept and
/// progress lines are throttled to every `throttle_frames` frames.
pub struct LogPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Series>,
    metrics: BTreeMap<String, Series>,
    start_time: Instant,
    frames: usize,
}

impl LogPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Session summary ({} frames, {elapsed_s:.1}s):",
            self.frames
        )];

        for (stage, series) in &self.timings {
            lines.push(format!(
                "  {stage:10}: avg {:6.2}ms  total {:8.1}ms",
                series.average(),
                series.total
            ));
        }
        for (name, series) in &self.metrics {
            lines.push(format!("  {name}: avg {:.2}", series.average()));
        }
        if self.frames > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.frames as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn average_timing(&self, stage: &str) -> Option<f64> {
        self.timings.get(stage).map(Series::average)
    }

    pub fn average_metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).map(Series::average)
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn progress(&mut self, frames: usize) {
        self.frames = frames;
        if frames % self.throttle_frames == 0 {
            log::info!("Processed {frames} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1);
        logger.timing("detect", 5.0);
        logger.metric("hands", 1.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_averages_per_stage() {
        let mut logger = LogPipelineLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("process", 1.0);

        assert_relative_eq!(logger.average_timing("detect").unwrap(), 25.0);
        assert_relative_eq!(logger.average_timing("process").unwrap(), 1.0);
        assert!(logger.average_timing("publish").is_none());
    }

    #[test]
    fn test_metric_averages() {
        let mut logger = LogPipelineLogger::new(10);
        logger.metric("hands", 0.0);
        logger.metric("hands", 2.0);
        assert_relative_eq!(logger.average_metric("hands").unwrap(), 1.0);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let mut logger = LogPipelineLogger::new(10);
        logger.progress(4);
        logger.timing("process", 0.5);
        logger.timing("detect", 8.0);
        logger.metric("hands", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Session summary (4 frames"));
        let detect_at = summary.find("detect").unwrap();
        let process_at = summary.find("process").unwrap();
        assert!(detect_at < process_at);
        assert!(summary.contains("hands: avg 1.00"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frame_count() {
        let mut logger = LogPipelineLogger::new(10);
        for frames in 1..=25 {
            logger.progress(frames);
        }
        assert_eq!(logger.frames, 25);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        let logger = LogPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
    }
}
