//! Compile-time defaults shared across the workspace.
//!
//! Every value here can be overridden at runtime through the tuning table
//! loaded by the engine; these are the values used when no override exists.

/// Orbit camera defaults.
pub mod camera;

/// Two-tone palette used by particles, ornaments and the topper.
pub mod palette;

/// Asset paths.
pub mod path;

/// Smoothing, jitter and ambient rotation defaults for the interpolation step.
pub mod motion;

/// Element counts and formation dimensions.
pub mod scene;
