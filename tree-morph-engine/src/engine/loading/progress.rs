use bevy::prelude::*;

#[derive(Resource, Default)]
pub struct LoadingProgress {
    pub tuning_loaded: bool,
    /// Whether the built-in defaults stand in for a missing or broken file.
    pub tuning_defaulted: bool,
    pub scene_spawned: bool,
}
