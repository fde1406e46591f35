//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the scene, asset loading systems,
/// and platform-specific configurations.
pub mod app_setup;

/// Application state machine and the loading transition.
pub mod app_state;

/// Headless runtime plugin: tracking, morph state, camera and interpolation.
pub mod runtime_plugin;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
