use bevy::prelude::*;

use crate::engine::field::morph_field::MorphField;
use crate::engine::mesh::billboard_quads::create_billboard_mesh;
use crate::engine::scene::particle_cloud::glow_material;
use constants::palette::{GOLD, GROUND};
use constants::scene::{GROUND_RADIUS, TOPPER_RADIUS};

#[derive(Component)]
pub struct TopperView;

#[derive(Component)]
pub struct GroundSparkles;

/// Emissive gold star at the apex; bright enough to bloom.
pub fn spawn_topper(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    field: &MorphField,
) {
    let Some(transform) = field.topper_transform() else {
        return;
    };

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(TOPPER_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: GOLD,
            emissive: GOLD.to_linear() * 4.0,
            metallic: 1.0,
            perceptual_roughness: 0.2,
            ..default()
        })),
        transform,
        TopperView,
    ));
}

/// Dark ground disc plus a flat ring of static sparkles lying on it.
pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    field: &MorphField,
) {
    commands.spawn((
        Mesh3d(meshes.add(Circle::new(GROUND_RADIUS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: GROUND,
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2)),
    ));

    let sparkles = field.sparkles();
    if sparkles.is_empty() {
        return;
    }

    // Quads spanned by X and Z lie flat on the ground.
    let mesh = create_billboard_mesh(
        sparkles.iter().map(|sparkle| (sparkle.position, sparkle.size)),
        sparkles.iter().map(|sparkle| sparkle.color),
        Vec3::X,
        Vec3::Z,
    );
    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(glow_material(materials)),
        Transform::default(),
        GroundSparkles,
    ));
}

pub fn sync_topper(field: Res<MorphField>, mut toppers: Query<&mut Transform, With<TopperView>>) {
    let Some(pose) = field.topper_transform() else {
        return;
    };
    for mut transform in &mut toppers {
        *transform = pose;
    }
}
