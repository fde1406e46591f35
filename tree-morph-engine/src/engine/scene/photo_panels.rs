use bevy::prelude::*;

use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::field::elements::PhotoId;
use crate::engine::field::morph_field::MorphField;
use crate::engine::geometry::scene_rng::SceneRng;
use crate::engine::loading::photo_textures::{PhotoTexture, PhotoTextures};
use crate::engine::morph::state_machine::MorphStateMachine;
use crate::engine::tuning::MorphTuning;
use constants::palette::{PHOTO_FRAME, PHOTO_PLACEHOLDER};
use constants::scene::{PHOTO_FRAME_SIZE, PHOTO_PICTURE_OFFSET, PHOTO_PICTURE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    /// Listed in the tuning table.
    Initial,
    Rpc,
    DragAndDrop,
}

/// Request to append a photo panel. Handled once per frame, outside the
/// interpolation step.
#[derive(Event, Debug, Clone)]
pub struct PhotoUploadRequest {
    pub id: PhotoId,
    pub url: String,
    pub source: UploadSource,
}

/// Rendered panel; the id looks up the panel in the field.
#[derive(Component, Debug, Clone)]
pub struct PhotoPanelView {
    pub id: PhotoId,
}

/// Meshes and frame material shared by every panel.
#[derive(Resource)]
pub struct PhotoPanelAssets {
    frame_mesh: Handle<Mesh>,
    picture_mesh: Handle<Mesh>,
    frame_material: Handle<StandardMaterial>,
}

impl PhotoPanelAssets {
    pub fn new(meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            frame_mesh: meshes.add(Rectangle::from_size(PHOTO_FRAME_SIZE)),
            picture_mesh: meshes.add(Rectangle::from_size(PHOTO_PICTURE_SIZE)),
            frame_material: materials.add(StandardMaterial {
                base_color: PHOTO_FRAME,
                perceptual_roughness: 0.8,
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
        }
    }
}

/// Adds requested panels to the field and spawns them with a placeholder
/// picture. The texture load is started here and polled elsewhere.
pub fn handle_photo_uploads(
    mut uploads: EventReader<PhotoUploadRequest>,
    mut field: ResMut<MorphField>,
    mut rng: ResMut<SceneRng>,
    mut textures: ResMut<PhotoTextures>,
    panel_assets: Res<PhotoPanelAssets>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    mut commands: Commands,
) {
    for upload in uploads.read() {
        let Some(slot) = field.add_photo(&mut rng.0, upload.id.clone(), upload.url.clone())
        else {
            warn!("Photo '{}' already exists; ignoring {:?} upload", upload.id, upload.source);
            continue;
        };

        let image: Handle<Image> = asset_server.load(upload.url.clone());
        let picture_material = materials.add(StandardMaterial {
            base_color: PHOTO_PLACEHOLDER,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        textures.track(
            upload.id.clone(),
            PhotoTexture {
                image,
                material: picture_material.clone(),
            },
        );

        let position = field
            .photo(&upload.id)
            .map(|panel| panel.path().current_position())
            .unwrap_or_default();

        commands
            .spawn((
                Mesh3d(panel_assets.frame_mesh.clone()),
                MeshMaterial3d(panel_assets.frame_material.clone()),
                Transform::from_translation(position),
                PhotoPanelView {
                    id: upload.id.clone(),
                },
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(panel_assets.picture_mesh.clone()),
                    MeshMaterial3d(picture_material),
                    Transform::from_translation(PHOTO_PICTURE_OFFSET),
                ));
            });

        info!(
            "✓ Photo '{}' added in slot {} ({} panels)",
            upload.id,
            slot,
            field.photos().len()
        );
    }
}

pub fn sync_photo_panels(
    field: Res<MorphField>,
    machine: Res<MorphStateMachine>,
    tuning: Res<MorphTuning>,
    orbit: Res<OrbitCamera>,
    mut views: Query<(&PhotoPanelView, &mut Transform)>,
) {
    let eye = orbit.eye();
    for (view, mut transform) in &mut views {
        if let Some(panel) = field.photo(&view.id) {
            *transform = field.photo_transform(panel, machine.state(), eye, &tuning.motion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tuning::ElementCounts;

    fn app() -> App {
        let tuning = MorphTuning {
            counts: ElementCounts {
                particles: 10,
                ornaments: 2,
                ground_sparkles: 0,
            },
            ..default()
        };
        let mut rng = SceneRng::from_seed(tuning.seed);
        let field = MorphField::build(&mut rng.0, &tuning);

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_asset::<Image>()
            .insert_resource(field)
            .insert_resource(rng)
            .insert_resource(tuning)
            .init_resource::<PhotoTextures>()
            .init_resource::<MorphStateMachine>()
            .init_resource::<OrbitCamera>()
            .add_event::<PhotoUploadRequest>()
            .add_systems(Update, (handle_photo_uploads, sync_photo_panels).chain());

        let world = app.world_mut();
        let assets = world.resource_scope(|world, mut meshes: Mut<Assets<Mesh>>| {
            let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
            PhotoPanelAssets::new(&mut meshes, &mut materials)
        });
        world.insert_resource(assets);
        app
    }

    fn upload(app: &mut App, id: &str) {
        app.world_mut().send_event(PhotoUploadRequest {
            id: PhotoId::from(id),
            url: format!("photos/{id}.jpg"),
            source: UploadSource::Rpc,
        });
        app.update();
    }

    #[test]
    fn uploads_spawn_one_panel_each_and_start_tracking_the_texture() {
        let mut app = app();
        upload(&mut app, "a");
        upload(&mut app, "b");

        let panels = app
            .world_mut()
            .query::<&PhotoPanelView>()
            .iter(app.world())
            .count();
        assert_eq!(panels, 2);
        assert_eq!(app.world().resource::<MorphField>().photos().len(), 2);
        assert_eq!(app.world().resource::<PhotoTextures>().pending_count(), 2);
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        let mut app = app();
        upload(&mut app, "a");
        upload(&mut app, "a");

        let panels = app
            .world_mut()
            .query::<&PhotoPanelView>()
            .iter(app.world())
            .count();
        assert_eq!(panels, 1);
        assert_eq!(app.world().resource::<MorphField>().photos().len(), 1);
    }
}
