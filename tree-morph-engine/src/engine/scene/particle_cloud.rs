use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;

use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::field::morph_field::MorphField;
use crate::engine::mesh::billboard_quads::{create_billboard_mesh, update_billboard_mesh};
use crate::engine::morph::state_machine::MorphStateMachine;
use crate::engine::tuning::MorphTuning;

#[derive(Component)]
pub struct ParticleCloud;

/// Additive, unlit vertex-coloured material shared by every quad cloud.
pub fn glow_material(materials: &mut Assets<StandardMaterial>) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        alpha_mode: AlphaMode::Add,
        cull_mode: None,
        ..default()
    })
}

pub fn spawn_particle_cloud(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    field: &MorphField,
    eye: Vec3,
) {
    let particles = field.particles();
    let facing = Transform::from_translation(eye).looking_at(Vec3::ZERO, Vec3::Y);
    let mesh = create_billboard_mesh(
        particles
            .iter()
            .map(|particle| (particle.path().current_position(), particle.size)),
        particles.iter().map(|particle| particle.color),
        *facing.right(),
        *facing.up(),
    );

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(glow_material(materials)),
        Transform::default(),
        ParticleCloud,
        // Bounds change every frame as the cloud morphs.
        NoFrustumCulling,
    ));
    info!("Particle cloud spawned with {} points", particles.len());
}

/// Publishes the field's particle positions into the cloud mesh and turns
/// the quads toward the camera.
///
/// Positions are cloud-local; the whole cloud rotates through its transform.
pub fn sync_particle_cloud(
    field: Res<MorphField>,
    machine: Res<MorphStateMachine>,
    tuning: Res<MorphTuning>,
    orbit: Res<OrbitCamera>,
    mut clouds: Query<(&Mesh3d, &mut Transform), With<ParticleCloud>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let rotation = Quat::from_rotation_y(field.rotation());
    let camera = orbit.transform();
    let inverse = rotation.inverse();
    let right = inverse * *camera.right();
    let up = inverse * *camera.up();

    for (mesh3d, mut transform) in &mut clouds {
        transform.rotation = rotation;

        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };
        let points = field
            .particle_positions(machine.state(), &tuning.motion)
            .zip(field.particles().iter().map(|particle| particle.size));
        if !update_billboard_mesh(mesh, points, right, up) {
            error!("Particle cloud mesh lost its position attribute");
        }
    }
}
