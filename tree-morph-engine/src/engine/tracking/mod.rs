//! Hand-tracking sessions and their lifecycle.
//!
//! A session produces landmark frames on its own cadence and hands them to
//! the render loop through a `FrameSink`. Failing to start one, or losing it
//! later, only ever degrades the app to manual control.

use serde::{Deserialize, Serialize};

/// Session trait, status and the controller resource.
pub mod session;

/// Native landmark producer running as a child process.
#[cfg(not(target_arch = "wasm32"))]
pub mod subprocess;

/// Systems starting, stopping and supervising sessions.
pub mod systems;

/// How to reach a landmark producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Start tracking as soon as the scene is running.
    pub autostart: bool,
    /// Executable printing one detection JSON document per line (native only).
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Hands reported with a lower score are ignored.
    pub min_confidence: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            autostart: false,
            command: None,
            args: Vec::new(),
            min_confidence: 0.5,
        }
    }
}
