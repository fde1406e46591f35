//! Runtime systems for user input and status reporting.

/// Keyboard and drag-and-drop input mapped to morph, tracking and upload
/// requests.
pub mod controls;

/// Status snapshot, periodic and edge-triggered notifications, and the
/// native overlay text.
pub mod status;
