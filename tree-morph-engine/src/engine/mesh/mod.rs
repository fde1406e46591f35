//! Mesh generation for point-like primitives.
//!
//! Points are drawn as camera-facing quads built on the CPU: six vertices
//! per point, two triangles each, rewritten in place whenever the camera or
//! the points move.

/// Billboard quad geometry for particle clouds and sparkles.
pub mod billboard_quads;
