//! Scene entities that render the morph field.
//!
//! The field owns every position; systems here only copy the emitted poses
//! into Bevy transforms and meshes once per frame.

/// Scene construction on entering the running state.
pub mod spawn;

/// Camera-facing quad cloud for the particles.
pub mod particle_cloud;

/// Sphere and cube ornaments.
pub mod ornaments;

/// Polaroid photo panels, upload requests and placeholder materials.
///
/// Panels spawn with a placeholder picture that the texture poller swaps out.
pub mod photo_panels;

/// Tree topper, ground disc and sparkle ring.
pub mod decorations;
