//! Asset loading: the tuning table before the scene starts, photo textures
//! while it runs.

/// Tuning table loading with fallback to built-in defaults.
pub mod tuning_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;

/// Photo texture load-state polling and material swap-in.
pub mod photo_textures;
