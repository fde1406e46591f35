use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::morph::state_machine::MorphState;
use constants::motion::{
    FIELD_ROTATION_SPEED, FOCUS_PULL_DISTANCE, FOCUS_SCALE, FOCUS_SMOOTHING, MAX_FRAME_DELTA,
    ORNAMENT_ASSEMBLE_SMOOTHING, ORNAMENT_DISPERSE_SMOOTHING, PARTICLE_ASSEMBLE_SMOOTHING,
    PARTICLE_DISPERSE_SMOOTHING, PHOTO_ASSEMBLE_SMOOTHING, PHOTO_DISPERSE_SMOOTHING,
    REFERENCE_FRAME_RATE, SCATTER_JITTER_AMPLITUDE, SCATTER_JITTER_FREQUENCY,
    TOPPER_ASSEMBLE_SMOOTHING, TOPPER_DISPERSE_SMOOTHING, TREE_JITTER_AMPLITUDE,
    TREE_JITTER_FREQUENCY,
};

/// Per-frame smoothing factors for one element class, one per direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalSmoothing {
    /// Applied while converging on the tree formation.
    pub assemble: f32,
    /// Applied while converging on the scattered formation.
    pub disperse: f32,
}

impl DirectionalSmoothing {
    pub const fn new(assemble: f32, disperse: f32) -> Self {
        Self { assemble, disperse }
    }

    pub fn for_state(&self, state: MorphState) -> f32 {
        match state {
            MorphState::TreeShape => self.assemble,
            MorphState::Scattered => self.disperse,
        }
    }
}

/// Periodic offset parameters for one formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterWave {
    pub amplitude: f32,
    pub frequency: f32,
}

/// Every smoothing, jitter, rotation and focus constant the field uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    pub particles: DirectionalSmoothing,
    pub ornaments: DirectionalSmoothing,
    pub photos: DirectionalSmoothing,
    pub topper: DirectionalSmoothing,
    /// Vertical breathing while assembled.
    pub tree_jitter: JitterWave,
    /// Horizontal drift while scattered.
    pub scatter_jitter: JitterWave,
    /// Radians per second about +Y, applied to the particle cloud transform.
    pub field_rotation_speed: f32,
    pub focus_scale: f32,
    pub focus_pull_distance: f32,
    pub focus_smoothing: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            particles: DirectionalSmoothing::new(
                PARTICLE_ASSEMBLE_SMOOTHING,
                PARTICLE_DISPERSE_SMOOTHING,
            ),
            ornaments: DirectionalSmoothing::new(
                ORNAMENT_ASSEMBLE_SMOOTHING,
                ORNAMENT_DISPERSE_SMOOTHING,
            ),
            photos: DirectionalSmoothing::new(PHOTO_ASSEMBLE_SMOOTHING, PHOTO_DISPERSE_SMOOTHING),
            topper: DirectionalSmoothing::new(TOPPER_ASSEMBLE_SMOOTHING, TOPPER_DISPERSE_SMOOTHING),
            tree_jitter: JitterWave {
                amplitude: TREE_JITTER_AMPLITUDE,
                frequency: TREE_JITTER_FREQUENCY,
            },
            scatter_jitter: JitterWave {
                amplitude: SCATTER_JITTER_AMPLITUDE,
                frequency: SCATTER_JITTER_FREQUENCY,
            },
            field_rotation_speed: FIELD_ROTATION_SPEED,
            focus_scale: FOCUS_SCALE,
            focus_pull_distance: FOCUS_PULL_DISTANCE,
            focus_smoothing: FOCUS_SMOOTHING,
        }
    }
}

/// Converts a per-reference-frame smoothing factor into the factor for a frame
/// of `dt` seconds: `1 - (1 - k)^(dt * 60)`. Always in `[0, 1)` for `k < 1`.
pub fn smoothing_factor(k: f32, dt: f32) -> f32 {
    if !k.is_finite() || !dt.is_finite() {
        return 0.0;
    }

    let k = k.clamp(0.0, 1.0);
    let frames = dt.clamp(0.0, MAX_FRAME_DELTA) * REFERENCE_FRAME_RATE;
    1.0 - (1.0 - k).powf(frames)
}

/// One first-order smoothing step.
pub fn approach(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    current + (target - current) * factor
}

/// Scalar variant of [`approach`].
pub fn approach_scalar(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Ambient offset added to an element's emitted position. Never folded back
/// into the stored current position.
pub fn jitter_offset(state: MorphState, elapsed: f32, phase: f32, motion: &MotionTuning) -> Vec3 {
    match state {
        MorphState::TreeShape => {
            let wave = motion.tree_jitter;
            Vec3::Y * wave.amplitude * (elapsed * wave.frequency + phase).sin()
        }
        MorphState::Scattered => {
            let wave = motion.scatter_jitter;
            let drift = wave.amplitude * (elapsed * wave.frequency + phase).sin();
            Vec3::new(drift, 0.0, drift)
        }
    }
}
