use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::camera::orbit_camera::CameraTuning;
use crate::engine::field::interpolation::MotionTuning;
use crate::engine::field::photos::GalleryTuning;
use crate::engine::geometry::sampler::{ConeShape, RibbonShape};
use crate::engine::tracking::TrackingConfig;
use constants::scene::{
    DEFAULT_SCENE_SEED, GROUND_RING_INNER_RADIUS, GROUND_RING_WIDTH, GROUND_SPARKLE_COUNT,
    INTRO_ASSEMBLE_DELAY_SECS, ORNAMENT_COUNT, ORNAMENT_SCATTER_RADIUS, PARTICLE_COUNT,
    SCATTER_RADIUS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementCounts {
    pub particles: usize,
    pub ornaments: usize,
    pub ground_sparkles: usize,
}

impl Default for ElementCounts {
    fn default() -> Self {
        Self {
            particles: PARTICLE_COUNT,
            ornaments: ORNAMENT_COUNT,
            ground_sparkles: GROUND_SPARKLE_COUNT,
        }
    }
}

/// Shapes of both formations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationTuning {
    pub cone: ConeShape,
    pub ribbon: RibbonShape,
    pub particle_scatter_radius: f32,
    pub ornament_scatter_radius: f32,
    pub ground_ring_inner_radius: f32,
    pub ground_ring_width: f32,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            cone: ConeShape::default(),
            ribbon: RibbonShape::default(),
            particle_scatter_radius: SCATTER_RADIUS,
            ornament_scatter_radius: ORNAMENT_SCATTER_RADIUS,
            ground_ring_inner_radius: GROUND_RING_INNER_RADIUS,
            ground_ring_width: GROUND_RING_WIDTH,
        }
    }
}

/// Complete tuning table as a Bevy asset. Every field is optional in JSON;
/// anything missing takes the compile-time default.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphTuning {
    /// Seed of the scene RNG; the same seed rebuilds the same formation.
    pub seed: u64,
    pub counts: ElementCounts,
    pub formation: FormationTuning,
    pub motion: MotionTuning,
    pub camera: CameraTuning,
    pub photos: GalleryTuning,
    pub tracking: TrackingConfig,
    /// Seconds before the intro assembles the tree; negative disables it.
    pub intro_assemble_delay_secs: f32,
}

impl Default for MorphTuning {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SCENE_SEED,
            counts: ElementCounts::default(),
            formation: FormationTuning::default(),
            motion: MotionTuning::default(),
            camera: CameraTuning::default(),
            photos: GalleryTuning::default(),
            tracking: TrackingConfig::default(),
            intro_assemble_delay_secs: INTRO_ASSEMBLE_DELAY_SECS,
        }
    }
}
