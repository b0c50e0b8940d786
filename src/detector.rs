// src/detector.rs - Bridge to the external MediaPipe hand-landmark detector
//
// The detector itself is a black box: frames go in, labeled landmark sets
// come out. It runs as a Python subprocess (`hand_detect.py`) speaking a
// small framed protocol: a 12-byte little-endian header (width, height,
// channels) followed by raw RGB bytes per request, one JSON line per
// response.
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};

use image::DynamicImage;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::landmarks::LANDMARK_COUNT;

const BRIDGE_SCRIPT: &str = "hand_detect.py";

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("detector script not found at {0}")]
    ScriptMissing(PathBuf),

    #[error("detector did not signal ready, got: {0:?}")]
    NotReady(String),

    #[error("detector stdio pipe unavailable: {0}")]
    Pipe(&'static str),
}

/// Detector knobs, fixed at construction time.
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    /// Treat every frame independently instead of tracking across frames.
    pub static_mode: bool,
    /// Maximum number of hands the detector may report.
    pub max_hands: u32,
    /// Minimum score for an initial detection, in [0, 1].
    pub detection_confidence: f32,
    /// Minimum score to keep tracking an already-detected hand, in [0, 1].
    pub tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            static_mode: false,
            max_hands: 2,
            detection_confidence: 0.8,
            tracking_confidence: 0.65,
        }
    }
}

impl DetectorConfig {
    fn to_args(self) -> Vec<String> {
        let mut args = vec![
            "--max-hands".to_string(),
            self.max_hands.to_string(),
            "--detection-confidence".to_string(),
            self.detection_confidence.to_string(),
            "--tracking-confidence".to_string(),
            self.tracking_confidence.to_string(),
        ];
        if self.static_mode {
            args.push("--static-mode".to_string());
        }
        args
    }
}

/// A landmark as the detector reports it: coordinates normalized to the
/// frame (x, y in [0, 1]; z relative depth in the same scale as x).
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One detected hand, straight off the wire.
#[derive(Debug, Deserialize, Clone)]
pub struct DetectedHand {
    pub handedness: String,
    pub score: f32,
    pub landmarks: Vec<NormalizedLandmark>,
}

#[derive(Debug, Deserialize)]
struct DetectionResponse {
    #[serde(default)]
    hands: Vec<DetectedHand>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HandDetector {
    process: Child,
    stdout: BufReader<ChildStdout>,
    config: DetectorConfig,
}

impl HandDetector {
    /// Spawn the detector subprocess and wait for its ready signal.
    ///
    /// Prefers a project-local virtualenv interpreter when one exists,
    /// otherwise whatever `python3` resolves to on PATH.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        let script = PathBuf::from(BRIDGE_SCRIPT);
        if !script.exists() {
            return Err(DetectorError::ScriptMissing(script));
        }

        let venv_python = PathBuf::from(".venv/bin/python");
        let interpreter = if venv_python.exists() {
            venv_python
        } else {
            PathBuf::from("python3")
        };

        info!(
            interpreter = %interpreter.display(),
            max_hands = config.max_hands,
            detection_confidence = config.detection_confidence,
            tracking_confidence = config.tracking_confidence,
            "starting hand landmark detector"
        );

        let mut process = Command::new(&interpreter)
            .arg(&script)
            .args(config.to_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdout = process.stdout.take().ok_or(DetectorError::Pipe("stdout"))?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout.read_line(&mut ready)?;
        if ready.trim() != "READY" {
            let _ = process.kill();
            return Err(DetectorError::NotReady(ready));
        }

        info!("hand landmark detector ready");

        Ok(Self {
            process,
            stdout,
            config,
        })
    }

    /// Run detection on one frame.
    ///
    /// Returns every hand that clears the detection-confidence threshold and
    /// carries a complete landmark set, in the detector's reporting order.
    /// An empty vec is the ordinary "no hand visible" outcome.
    pub fn detect(&mut self, frame: &DynamicImage) -> Result<Vec<DetectedHand>, DetectorError> {
        let rgb = frame.to_rgb8();
        let (width, height) = rgb.dimensions();

        let stdin = self
            .process
            .stdin
            .as_mut()
            .ok_or(DetectorError::Pipe("stdin"))?;
        stdin.write_all(&width.to_le_bytes())?;
        stdin.write_all(&height.to_le_bytes())?;
        stdin.write_all(&3u32.to_le_bytes())?;
        stdin.write_all(rgb.as_raw())?;
        stdin.flush()?;

        let mut line = String::new();
        self.stdout.read_line(&mut line)?;
        let response: DetectionResponse = serde_json::from_str(&line)?;

        if let Some(error) = response.error {
            warn!(error = %error, "detector reported an error for this frame");
            return Ok(Vec::new());
        }

        let threshold = self.config.detection_confidence;
        let hands = response
            .hands
            .into_iter()
            .filter(|hand| {
                if hand.landmarks.len() != LANDMARK_COUNT {
                    warn!(
                        got = hand.landmarks.len(),
                        "detector returned an incomplete landmark set, skipping hand"
                    );
                    return false;
                }
                hand.score >= threshold
            })
            .collect();

        Ok(hands)
    }
}

impl Drop for HandDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
    }
}
