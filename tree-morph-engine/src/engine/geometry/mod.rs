//! Procedural point generation for the two formations.
//!
//! Samplers are pure functions of their random inputs; the scene calls them
//! once per element at creation time and never per frame.

/// Volume, cone, ribbon and ground-ring samplers.
pub mod sampler;

/// Seeded random source the scene is built from.
pub mod scene_rng;
