use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::detection_frame::DetectionFrame;

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid detection frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads a recorded detector session: one JSON [`DetectionFrame`] per line.
///
/// Blank lines are skipped. Frames are re-indexed by their position in the
/// file so replay order is the file order.
pub fn read_recording(path: &Path) -> Result<Vec<DetectionFrame>, RecordingError> {
    let file = File::open(path).map_err(|source| RecordingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_recording(BufReader::new(file), path)
}

fn parse_recording(
    reader: impl BufRead,
    path: &Path,
) -> Result<Vec<DetectionFrame>, RecordingError> {
    let mut frames = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| RecordingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let mut frame: DetectionFrame =
            serde_json::from_str(&line).map_err(|source| RecordingError::Parse {
                line: i + 1,
                source,
            })?;
        frame.image.index = frames.len();
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ONE_HAND: &str = r#"{"image_landmarks":[[{"x":0.5,"y":0.4,"z":0.0}]],"handedness":[{"label":"Left","score":0.92}]}"#;

    fn write_recording(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_frames_in_file_order() {
        let file = write_recording(&format!("{ONE_HAND}\n{{}}\n\n{ONE_HAND}\n"));

        let frames = read_recording(file.path()).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].image.index, 0);
        assert!(frames[1].image_landmarks.is_none());
        assert_eq!(frames[2].image.index, 2);
        assert_eq!(frames[2].handedness.as_ref().unwrap()[0].label, "Left");
    }

    #[test]
    fn test_parse_error_reports_line() {
        let file = write_recording(&format!("{ONE_HAND}\nnot json\n"));

        let err = read_recording(file.path()).unwrap_err();

        assert!(matches!(err, RecordingError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_recording(Path::new("/nonexistent/recording.jsonl")).unwrap_err();
        assert!(matches!(err, RecordingError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/recording.jsonl"));
    }
}
