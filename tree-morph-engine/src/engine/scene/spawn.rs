use bevy::prelude::*;

use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::field::elements::PhotoId;
use crate::engine::field::morph_field::MorphField;
use crate::engine::geometry::scene_rng::SceneRng;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::decorations::{spawn_ground, spawn_topper};
use crate::engine::scene::ornaments::spawn_ornaments;
use crate::engine::scene::particle_cloud::spawn_particle_cloud;
use crate::engine::scene::photo_panels::{PhotoPanelAssets, PhotoUploadRequest, UploadSource};
use crate::engine::tuning::MorphTuning;

/// Builds the field from the installed tuning table and spawns everything
/// that renders it. Initial photos go through the regular upload path.
pub fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut uploads: EventWriter<PhotoUploadRequest>,
    tuning: Res<MorphTuning>,
) {
    if loading_progress.scene_spawned {
        return;
    }

    let mut rng = SceneRng::from_seed(tuning.seed);
    let field = MorphField::build(&mut rng.0, &tuning);
    let orbit = OrbitCamera::from_tuning(&tuning.camera);

    spawn_particle_cloud(&mut commands, &mut meshes, &mut materials, &field, orbit.eye());
    spawn_ornaments(&mut commands, &mut meshes, &mut materials, &field);
    spawn_topper(&mut commands, &mut meshes, &mut materials, &field);
    spawn_ground(&mut commands, &mut meshes, &mut materials, &field);
    commands.insert_resource(PhotoPanelAssets::new(&mut meshes, &mut materials));

    for entry in &tuning.photos.initial_photos {
        uploads.write(PhotoUploadRequest {
            id: PhotoId(entry.id.clone()),
            url: entry.url.clone(),
            source: UploadSource::Initial,
        });
    }

    info!(
        "✓ Scene spawned: {} particles, {} ornaments, {} sparkles, {} photos queued (seed {})",
        field.particles().len(),
        field.ornaments().len(),
        field.sparkles().len(),
        tuning.photos.initial_photos.len(),
        tuning.seed
    );

    commands.insert_resource(field);
    commands.insert_resource(rng);
    commands.insert_resource(orbit);
    loading_progress.scene_spawned = true;
}
