//! Gesture-driven orbit camera.
//!
//! Provides idle auto-rotation, OPEN-hand orbit and zoom, and POINT focus on
//! the nearest photo panel, all through first-order smoothing.

/// Orbit camera resource and controller system.
pub mod orbit_camera;
