use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::tuning::MorphTuning;
use constants::path::TUNING_PATH;

#[derive(Resource, Default)]
pub struct TuningLoader {
    handle: Option<Handle<MorphTuning>>,
}

// Start the loading process
pub fn start_loading(mut tuning_loader: ResMut<TuningLoader>, asset_server: Res<AssetServer>) {
    tuning_loader.handle = Some(asset_server.load(TUNING_PATH));
}

/// Installs the loaded tuning table, or the built-in defaults if the file is
/// missing or malformed.
pub fn load_tuning_system(
    mut loading_progress: ResMut<LoadingProgress>,
    tuning_loader: Res<TuningLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tunings: Res<Assets<MorphTuning>>,
) {
    if loading_progress.tuning_loaded {
        return;
    }

    let Some(handle) = tuning_loader.handle.as_ref() else {
        return;
    };

    if let Some(tuning) = tunings.get(handle) {
        info!("✓ Tuning loaded from {TUNING_PATH}");
        commands.insert_resource(tuning.clone());
        loading_progress.tuning_loaded = true;
        return;
    }

    if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle) {
        warn!("Tuning table unavailable ({error}); using built-in defaults");
        commands.insert_resource(MorphTuning::default());
        loading_progress.tuning_loaded = true;
        loading_progress.tuning_defaulted = true;
    }
}
