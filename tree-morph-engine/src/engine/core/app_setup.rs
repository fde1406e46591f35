use bevy::asset::{AssetMetaCheck, UnapprovedPathMode};
use bevy::core_pipeline::bloom::Bloom;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::core::app_state::{AppState, transition_to_running};
use crate::engine::core::runtime_plugin::{MorphRuntimePlugin, RuntimeSet};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::photo_textures::{
    PhotoTextureStateChanged, PhotoTextures, check_photo_texture_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::tuning_loader::{TuningLoader, load_tuning_system, start_loading};
use crate::engine::scene::decorations::sync_topper;
use crate::engine::scene::ornaments::sync_ornaments;
use crate::engine::scene::particle_cloud::sync_particle_cloud;
use crate::engine::scene::photo_panels::{
    PhotoUploadRequest, handle_photo_uploads, sync_photo_panels,
};
use crate::engine::scene::spawn::spawn_scene;
use crate::engine::systems::controls::{file_drop_system, keyboard_control_system};
use crate::engine::systems::status::{
    StatusText, broadcast_state_changes, status_notification_system,
};
use crate::engine::tuning::MorphTuning;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;
use constants::camera::FIELD_OF_VIEW_DEGREES;
use constants::palette::{GOLD, PINK, PINK_GLOW};
use constants::scene::SCATTER_CENTER;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::status::status_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers the tuning table as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<MorphTuning>::new(&["json"]))
        .add_plugins(MorphRuntimePlugin)
        .add_plugins(WebRpcPlugin)
        .insert_resource(ClearColor(Color::BLACK));

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<TuningLoader>()
        .init_resource::<PhotoTextures>()
        .add_event::<PhotoUploadRequest>()
        .add_event::<PhotoTextureStateChanged>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (load_tuning_system, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), spawn_scene);

    // Input and uploads land before the morph step reads the field.
    app.add_systems(
        Update,
        (keyboard_control_system, file_drop_system, handle_photo_uploads)
            .chain()
            .in_set(RuntimeSet::Input),
    );

    app.add_systems(
        Update,
        (
            check_photo_texture_loading,
            sync_particle_cloud,
            sync_ornaments,
            sync_photo_panels,
            sync_topper,
            broadcast_state_changes,
            status_notification_system,
        )
            .in_set(RuntimeSet::Publish),
    );

    // Add status_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, status_text_update_system.in_set(RuntimeSet::Publish));
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 120.0,
        ..default()
    });

    // Warm key light above the tree, two coloured fills at its sides.
    for (color, intensity, position) in [
        (GOLD, 4_000_000.0, SCATTER_CENTER + Vec3::new(0.0, 12.0, 6.0)),
        (PINK, 1_500_000.0, SCATTER_CENTER + Vec3::new(-10.0, 2.0, 8.0)),
        (PINK_GLOW, 1_500_000.0, SCATTER_CENTER + Vec3::new(10.0, 2.0, -8.0)),
    ] {
        commands.spawn((
            PointLight {
                color,
                intensity,
                range: 60.0,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(position),
        ));
    }
}

fn create_bloom_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEGREES.to_radians(),
            ..default()
        }),
        OrbitCamera::default().transform(),
        Bloom::NATURAL,
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    create_bloom_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(GOLD),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    // Dropped photos load from absolute paths outside the asset root.
    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        unapproved_path_mode: UnapprovedPathMode::Allow,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
