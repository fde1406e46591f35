/// Frame rate the per-frame smoothing factors are expressed against.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

/// Longest frame delta fed to the smoothing step (seconds).
pub const MAX_FRAME_DELTA: f32 = 0.25;

/// Particle smoothing when assembling into the tree.
pub const PARTICLE_ASSEMBLE_SMOOTHING: f32 = 0.06;

/// Particle smoothing when dispersing into the scatter sphere.
pub const PARTICLE_DISPERSE_SMOOTHING: f32 = 0.03;

pub const ORNAMENT_ASSEMBLE_SMOOTHING: f32 = 0.06;
pub const ORNAMENT_DISPERSE_SMOOTHING: f32 = 0.04;

pub const PHOTO_ASSEMBLE_SMOOTHING: f32 = 0.05;
pub const PHOTO_DISPERSE_SMOOTHING: f32 = 0.04;

pub const TOPPER_ASSEMBLE_SMOOTHING: f32 = 0.08;
pub const TOPPER_DISPERSE_SMOOTHING: f32 = 0.08;

/// Vertical breathing while the tree is assembled.
pub const TREE_JITTER_AMPLITUDE: f32 = 0.005;
pub const TREE_JITTER_FREQUENCY: f32 = 3.0;

/// Horizontal drift while scattered.
pub const SCATTER_JITTER_AMPLITUDE: f32 = 0.002;
pub const SCATTER_JITTER_FREQUENCY: f32 = 0.5;

/// Whole-cloud rotation about +Y (radians per second).
pub const FIELD_ROTATION_SPEED: f32 = 0.12;

/// Scale applied to a focused photo panel.
pub const FOCUS_SCALE: f32 = 1.6;

/// Distance a focused photo panel is pulled toward the camera.
pub const FOCUS_PULL_DISTANCE: f32 = 0.6;

/// Smoothing of the focus weight (per reference frame).
pub const FOCUS_SMOOTHING: f32 = 0.1;
