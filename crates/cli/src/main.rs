mod settings;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use handwave_core::capture::infrastructure::recorded_hand_detector::RecordedHandDetector;
use handwave_core::capture::infrastructure::recording_reader::read_recording;
use handwave_core::capture::infrastructure::replay_frame_source::ReplayFrameSource;
use handwave_core::overlay::infrastructure::log_overlay::LogOverlay;
use handwave_core::pipeline::lifecycle_controller::LifecycleController;
use handwave_core::pipeline::pipeline_logger::LogPipelineLogger;
use handwave_core::shared::detection_frame::FrameOfReference;
use handwave_core::shared::hand::LANDMARK_NAMES;
use handwave_core::sync::domain::published_hands::{read_first_hand, LabeledHand};
use handwave_core::sync::domain::sync_channel::SyncChannel;
use handwave_core::sync::infrastructure::in_memory_model::InMemoryModel;
use handwave_core::sync::infrastructure::json_lines_model::JsonLinesModel;

use settings::Settings;

/// Replays a recorded hand-landmark session through the tracking pipeline
/// and prints every published model update as a JSON line.
#[derive(Parser)]
#[command(name = "handwave")]
struct Cli {
    /// Recorded detector output, one JSON detection frame per line.
    recording: PathBuf,

    /// Write model updates to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Settings file (defaults to the per-user Handwave settings).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Landmark set to publish: image or world.
    #[arg(long)]
    frame_of_reference: Option<FrameOfReference>,

    /// Maximum number of hands to track.
    #[arg(long)]
    max_num_hands: Option<u32>,

    /// Landmark model complexity.
    #[arg(long)]
    model_complexity: Option<f64>,

    /// Minimum detection confidence (0.0-1.0).
    #[arg(long)]
    min_detection_confidence: Option<f64>,

    /// Minimum tracking confidence (0.0-1.0).
    #[arg(long)]
    min_tracking_confidence: Option<f64>,

    /// Decimal places kept in published coordinates.
    #[arg(long)]
    precision: Option<u32>,

    /// Log the debug overlay summary.
    #[arg(long, conflicts_with = "no_debug")]
    debug: bool,

    /// Hide the debug overlay summary.
    #[arg(long)]
    no_debug: bool,

    /// Capture width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Capture height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Replay at this frame rate (0 = as fast as possible).
    #[arg(long)]
    fps: Option<f64>,

    /// Print the last published first hand as a table.
    #[arg(long)]
    show_hand: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    let settings = apply_overrides(settings, &cli);
    let snapshot = settings.to_snapshot()?;

    let recording = read_recording(&cli.recording)?;
    log::info!(
        "Loaded {} frames from {}",
        recording.len(),
        cli.recording.display()
    );

    let writer: Box<dyn Write + Send> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    let model = InMemoryModel::with_values(snapshot.to_entries());
    let channel = SyncChannel::new(Box::new(JsonLinesModel::new(model.clone(), writer)));

    let source = ReplayFrameSource::new(recording.len()).with_fps(settings.fps);
    let detector = RecordedHandDetector::from_recording(recording);
    let overlay = LogOverlay::new(snapshot.width, snapshot.height, snapshot.debug);

    let mut controller = LifecycleController::new(
        Box::new(source),
        Box::new(detector),
        channel,
        Box::new(overlay),
        Box::new(LogPipelineLogger::default()),
    );

    controller.start()?;
    let summary = controller.run();
    controller.stop();

    log::info!(
        "Replayed {} frames: {} published, {} skipped, {} sink failures",
        summary.frames,
        summary.published,
        summary.skipped,
        summary.sink_failures
    );
    if let Some(output) = &cli.output {
        log::info!("Model updates written to {}", output.display());
    }

    if cli.show_hand {
        match read_first_hand(&model)? {
            Some(hand) => print_hand(&hand),
            None => println!("No hand published"),
        }
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.recording.exists() {
        return Err(format!("Recording not found: {}", cli.recording.display()).into());
    }
    if let Some(config) = &cli.config {
        if !config.exists() {
            return Err(format!("Settings file not found: {}", config.display()).into());
        }
    }
    if let Some(fps) = cli.fps {
        if !fps.is_finite() || fps < 0.0 {
            return Err(format!("FPS must be a non-negative number, got {fps}").into());
        }
    }
    for (flag, value) in [
        ("--min-detection-confidence", cli.min_detection_confidence),
        ("--min-tracking-confidence", cli.min_tracking_confidence),
    ] {
        if let Some(value) = value {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{flag} must be between 0.0 and 1.0, got {value}").into());
            }
        }
    }
    if cli.max_num_hands == Some(0) {
        return Err("--max-num-hands must be at least 1".into());
    }
    if cli.width == Some(0) || cli.height == Some(0) {
        return Err("--width and --height must be positive".into());
    }
    Ok(())
}

fn apply_overrides(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(frame_of_reference) = cli.frame_of_reference {
        settings.frame_of_reference = frame_of_reference;
    }
    if let Some(max_num_hands) = cli.max_num_hands {
        settings.max_num_hands = max_num_hands;
    }
    if let Some(model_complexity) = cli.model_complexity {
        settings.model_complexity = model_complexity;
    }
    if let Some(confidence) = cli.min_detection_confidence {
        settings.min_detection_confidence = confidence;
    }
    if let Some(confidence) = cli.min_tracking_confidence {
        settings.min_tracking_confidence = confidence;
    }
    if let Some(precision) = cli.precision {
        settings.precision = precision;
    }
    if cli.debug {
        settings.debug = true;
    }
    if cli.no_debug {
        settings.debug = false;
    }
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if let Some(fps) = cli.fps {
        settings.fps = fps;
    }
    settings
}

fn print_hand(labeled: &LabeledHand) {
    match &labeled.handedness {
        Some(handedness) => println!("{} hand ({:.2})", handedness.label(), handedness.score()),
        None => println!("Hand (handedness unknown)"),
    }
    println!("{:<18} {:>9} {:>9} {:>9}", "landmark", "x", "y", "z");
    for (i, name) in LANDMARK_NAMES.iter().enumerate() {
        if let Some(point) = labeled.hand.point(i) {
            println!(
                "{name:<18} {:>9.4} {:>9.4} {:>9.4}",
                point.x, point.y, point.z
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write as _;

    fn recording_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{}}").unwrap();
        file
    }

    fn parse(recording: &tempfile::NamedTempFile, args: &[&str]) -> Cli {
        let path = recording.path().to_str().unwrap();
        Cli::try_parse_from(["handwave", path].iter().chain(args)).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let recording = recording_file();
        let cli = parse(&recording, &[]);
        assert!(validate(&cli).is_ok());
        assert!(!cli.show_hand);
    }

    #[test]
    fn test_missing_recording_rejected() {
        let cli = Cli::try_parse_from(["handwave", "/nonexistent/session.jsonl"]).unwrap();
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().contains("Recording not found"));
    }

    #[rstest]
    #[case::negative_fps(&["--fps=-1"])]
    #[case::confidence_too_high(&["--min-detection-confidence", "1.2"])]
    #[case::zero_hands(&["--max-num-hands", "0"])]
    #[case::zero_width(&["--width", "0"])]
    fn test_invalid_arguments_rejected(#[case] args: &[&str]) {
        let recording = recording_file();
        let cli = Cli::try_parse_from(
            ["handwave", recording.path().to_str().unwrap()]
                .iter()
                .chain(args),
        )
        .unwrap();
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_unknown_frame_of_reference_fails_to_parse() {
        let recording = recording_file();
        let path = recording.path().to_str().unwrap();
        assert!(
            Cli::try_parse_from(["handwave", path, "--frame-of-reference", "screen"]).is_err()
        );
    }

    #[test]
    fn test_debug_flags_conflict() {
        let recording = recording_file();
        let path = recording.path().to_str().unwrap();
        assert!(Cli::try_parse_from(["handwave", path, "--debug", "--no-debug"]).is_err());
    }

    #[test]
    fn test_overrides_replace_settings() {
        let recording = recording_file();
        let cli = parse(
            &recording,
            &[
                "--frame-of-reference",
                "world",
                "--precision",
                "5",
                "--no-debug",
                "--width",
                "320",
            ],
        );

        let settings = apply_overrides(Settings::default(), &cli);

        assert_eq!(settings.frame_of_reference, FrameOfReference::World);
        assert_eq!(settings.precision, 5);
        assert!(!settings.debug);
        assert_eq!((settings.width, settings.height), (320, 480));
    }

    #[test]
    fn test_absent_flags_keep_settings() {
        let recording = recording_file();
        let cli = parse(&recording, &[]);
        let settings = Settings {
            precision: 2,
            debug: false,
            ..Settings::default()
        };

        assert_eq!(apply_overrides(settings.clone(), &cli), settings);
    }
}
