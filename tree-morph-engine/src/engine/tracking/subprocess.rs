use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use bevy::prelude::*;

use crate::engine::gesture::landmarks::DetectionResult;
use crate::engine::gesture::latch::FrameSink;
use crate::engine::tracking::TrackingConfig;
use crate::engine::tracking::session::HandTrackingSession;

/// Runs a landmark producer (for example a MediaPipe script) as a child
/// process and reads one detection document per stdout line on its own thread.
pub struct SubprocessTracker {
    program: String,
    args: Vec<String>,
    min_confidence: f32,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl SubprocessTracker {
    pub fn new(program: impl Into<String>, args: Vec<String>, min_confidence: f32) -> Self {
        Self {
            program: program.into(),
            args,
            min_confidence: min_confidence.clamp(0.0, 1.0),
            child: None,
            reader: None,
        }
    }

    /// `None` when no producer command is configured.
    pub fn from_config(config: &TrackingConfig) -> Option<Self> {
        config
            .command
            .as_ref()
            .map(|program| Self::new(program.clone(), config.args.clone(), config.min_confidence))
    }
}

/// Parses one producer line. Only malformed JSON is an `Err`; a
/// producer-reported `error` comes back inside the detection.
pub fn parse_detection_line(line: &str) -> Result<DetectionResult> {
    serde_json::from_str(line).with_context(|| format!("malformed landmark frame: {line}"))
}

fn read_frames(stdout: impl std::io::Read, sink: FrameSink, min_confidence: f32) {
    for line in BufReader::new(stdout).lines() {
        if !sink.is_current() {
            return;
        }

        let line = match line {
            Ok(line) => line,
            Err(error) => {
                sink.report_failure(format!("landmark stream broke: {error}"));
                return;
            }
        };

        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            // Banner lines such as READY.
            debug!("Landmark producer: {trimmed}");
            continue;
        }

        let detection = match parse_detection_line(trimmed) {
            Ok(detection) => detection,
            Err(error) => {
                warn!("Skipping landmark frame: {error:#}");
                continue;
            }
        };

        if let Some(error) = detection.error.as_deref() {
            sink.report_failure(format!("landmark producer reported: {error}"));
            return;
        }

        match detection.confident_hand(min_confidence) {
            Some(landmarks) => {
                sink.publish_landmarks(landmarks);
            }
            None => {
                sink.publish_no_hand();
            }
        }
    }

    sink.report_failure("landmark producer exited");
}

impl HandTrackingSession for SubprocessTracker {
    fn name(&self) -> &str {
        &self.program
    }

    fn start(&mut self, sink: FrameSink) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to launch landmark producer `{}`", self.program))?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            anyhow::bail!("landmark producer `{}` has no stdout", self.program);
        };

        let min_confidence = self.min_confidence;
        let reader = std::thread::Builder::new()
            .name("hand-landmarks".into())
            .spawn(move || read_frames(stdout, sink, min_confidence));

        match reader {
            Ok(handle) => {
                self.child = Some(child);
                self.reader = Some(handle);
                Ok(())
            }
            Err(error) => {
                let _ = child.kill();
                Err(error).context("failed to spawn landmark reader thread")
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(error) = child.kill() {
                debug!("Landmark producer already gone: {error}");
            }
            let _ = child.wait();
        }
        // The reader sees EOF once the child is gone and exits on its own;
        // its sink is already fenced, so it is not joined here.
        self.reader = None;
    }
}

impl Drop for SubprocessTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
