use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::field::interpolation::approach;
use crate::engine::morph::state_machine::MorphState;

/// Fixed scatter/tree target pair plus the interpolated position between them.
///
/// Targets are set once at creation. The current position starts on the
/// scatter target and is only moved by the field's per-frame step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphPath {
    scatter: Vec3,
    tree: Vec3,
    current: Vec3,
}

impl MorphPath {
    pub fn new(scatter: Vec3, tree: Vec3) -> Self {
        Self {
            scatter,
            tree,
            current: scatter,
        }
    }

    pub fn scatter_position(&self) -> Vec3 {
        self.scatter
    }

    pub fn tree_position(&self) -> Vec3 {
        self.tree
    }

    pub fn current_position(&self) -> Vec3 {
        self.current
    }

    pub fn target(&self, state: MorphState) -> Vec3 {
        match state {
            MorphState::Scattered => self.scatter,
            MorphState::TreeShape => self.tree,
        }
    }

    pub fn distance_to_target(&self, state: MorphState) -> f32 {
        self.current.distance(self.target(state))
    }

    pub(super) fn advance(&mut self, state: MorphState, factor: f32) {
        self.current = approach(self.current, self.target(state), factor);
    }

    /// Gallery reflow is the only caller; every other target is immutable.
    pub(super) fn retarget_scatter(&mut self, scatter: Vec3) {
        self.scatter = scatter;
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub index: usize,
    pub(super) path: MorphPath,
    pub color: Color,
    pub size: f32,
    pub phase: f32,
}

impl Particle {
    pub fn path(&self) -> &MorphPath {
        &self.path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrnamentKind {
    Sphere,
    Cube,
}

#[derive(Debug, Clone)]
pub struct OrnamentInstance {
    pub index: usize,
    pub(super) path: MorphPath,
    pub color: Color,
    pub kind: OrnamentKind,
    pub phase: f32,
}

impl OrnamentInstance {
    pub fn path(&self) -> &MorphPath {
        &self.path
    }
}

/// Caller-supplied photo identifier, unique within a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Where a panel's texture is in its asynchronous load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureRef {
    #[default]
    Pending,
    Loaded,
    Failed,
}

impl TextureRef {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureRef::Pending => "pending",
            TextureRef::Loaded => "loaded",
            TextureRef::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhotoPanel {
    pub id: PhotoId,
    pub url: String,
    pub texture: TextureRef,
    /// Creation order; the gallery layout derives the scatter target from it.
    pub slot: usize,
    pub(super) path: MorphPath,
    pub focused: bool,
    /// Smoothed 0..1 blend toward the focused pose.
    pub(super) focus_weight: f32,
}

impl PhotoPanel {
    pub fn path(&self) -> &MorphPath {
        &self.path
    }

    pub fn focus_weight(&self) -> f32 {
        self.focus_weight
    }
}

/// Star at the apex of the tree.
#[derive(Debug, Clone)]
pub struct TreeTopper {
    pub(super) path: MorphPath,
    pub(super) spin: f32,
}

impl TreeTopper {
    pub fn path(&self) -> &MorphPath {
        &self.path
    }
}

/// Static ground decoration. Never interpolated.
#[derive(Debug, Clone, Copy)]
pub struct GroundSparkle {
    pub position: Vec3,
    pub color: Color,
    pub size: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_starts_scattered_and_targets_follow_state() {
        let path = MorphPath::new(Vec3::X, Vec3::Y);
        assert_eq!(path.current_position(), Vec3::X);
        assert_eq!(path.target(MorphState::Scattered), Vec3::X);
        assert_eq!(path.target(MorphState::TreeShape), Vec3::Y);
        assert_eq!(path.distance_to_target(MorphState::Scattered), 0.0);
    }

    #[test]
    fn advancing_never_touches_targets() {
        let mut path = MorphPath::new(Vec3::ZERO, Vec3::splat(4.0));
        for _ in 0..10 {
            path.advance(MorphState::TreeShape, 0.5);
        }
        assert_eq!(path.scatter_position(), Vec3::ZERO);
        assert_eq!(path.tree_position(), Vec3::splat(4.0));
        assert!(path.distance_to_target(MorphState::TreeShape) < 0.01);
    }
}
