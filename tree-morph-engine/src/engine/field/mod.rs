//! Element field: every morphing element with its fixed scatter/tree targets
//! and the per-frame interpolation that moves it between them.

/// Element records (particles, ornaments, photo panels, topper, sparkles).
pub mod elements;

/// Frame-rate independent smoothing, jitter and the motion tuning table.
pub mod interpolation;

/// The `MorphField` resource: construction, photo registry and per-frame step.
pub mod morph_field;

/// Photo gallery layout policy and panel focus.
pub mod photos;
