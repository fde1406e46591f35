use bevy::math::{Vec2, Vec3};

/// Number of points in the particle cloud.
pub const PARTICLE_COUNT: usize = 8000;

/// Number of instanced ornaments (spheres and cubes).
pub const ORNAMENT_COUNT: usize = 150;

/// Number of static sparkles scattered on the ground ring.
pub const GROUND_SPARKLE_COUNT: usize = 240;

/// Height of the tree formation, base at y = 0.
pub const TREE_HEIGHT: f32 = 10.0;

/// Radius of the tree formation at its base.
pub const TREE_RADIUS: f32 = 4.0;

/// Spiral turns applied to particles climbing the cone.
pub const TREE_SPIRAL_TURNS: f32 = 7.0;

/// Angular jitter (radians) added to each spiral sample.
pub const TREE_SPIRAL_JITTER: f32 = 0.4;

/// Radius of the particle scatter sphere.
pub const SCATTER_RADIUS: f32 = 15.0;

/// Radius of the ornament scatter sphere.
pub const ORNAMENT_SCATTER_RADIUS: f32 = 12.0;

/// Centre of both scatter spheres; also the default look-at point.
pub const SCATTER_CENTER: Vec3 = Vec3::new(0.0, 5.0, 0.0);

/// Topper resting point in the tree formation.
pub const TOPPER_TREE_POSITION: Vec3 = Vec3::new(0.0, TREE_HEIGHT + 0.5, 0.0);

/// Topper spin around its vertical axis (radians per second).
pub const TOPPER_SPIN_SPEED: f32 = 1.2;

/// Anchor of the photo ribbon (helix centre).
pub const RIBBON_ANCHOR: Vec3 = SCATTER_CENTER;

/// Ribbon radius at its first element.
pub const RIBBON_RADIUS: f32 = 8.0;

/// Fraction of the radius lost by the last ribbon element.
pub const RIBBON_TAPER: f32 = 0.25;

/// Full turns the ribbon makes across all photos.
pub const RIBBON_TURNS: f32 = 2.0;

/// Vertical span of the ribbon, centred on the anchor.
pub const RIBBON_HEIGHT_SPAN: f32 = 8.0;

/// Inner radius of the ground sparkle ring.
pub const GROUND_RING_INNER_RADIUS: f32 = 5.0;

/// Width of the ground sparkle ring.
pub const GROUND_RING_WIDTH: f32 = 15.0;

/// Height at which ground sparkles rest.
pub const GROUND_HEIGHT: f32 = 0.1;

/// Probability that a particle takes the primary (pink) colour.
pub const PARTICLE_PRIMARY_SHARE: f64 = 0.55;

/// Probability that an ornament takes the primary (pink) colour.
pub const ORNAMENT_PRIMARY_SHARE: f64 = 0.5;

/// Probability that an ornament is a cube rather than a sphere.
pub const ORNAMENT_CUBE_SHARE: f64 = 0.3;

/// Particle size range (world units).
pub const PARTICLE_SIZE_MIN: f32 = 0.02;
pub const PARTICLE_SIZE_MAX: f32 = 0.07;

/// Seed for the scene RNG so a formation can be reproduced.
pub const DEFAULT_SCENE_SEED: u64 = 12345;

/// Delay before the intro assembles the tree on its own (seconds).
pub const INTRO_ASSEMBLE_DELAY_SECS: f32 = 1.5;

/// Ornament sphere radius.
pub const ORNAMENT_SPHERE_RADIUS: f32 = 0.15;
/// Ornament cube edge length.
pub const ORNAMENT_CUBE_SIZE: f32 = 0.22;

/// Polaroid frame (width, height).
pub const PHOTO_FRAME_SIZE: Vec2 = Vec2::new(1.2, 1.45);
pub const PHOTO_PICTURE_SIZE: Vec2 = Vec2::new(1.0, 1.0);
/// Picture offset inside the frame; the wider margin sits at the bottom.
pub const PHOTO_PICTURE_OFFSET: Vec3 = Vec3::new(0.0, 0.12, 0.01);

pub const TOPPER_RADIUS: f32 = 0.45;
/// Radius of the ground disc.
pub const GROUND_RADIUS: f32 = 30.0;
