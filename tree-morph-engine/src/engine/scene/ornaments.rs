use bevy::prelude::*;

use crate::engine::field::elements::OrnamentKind;
use crate::engine::field::morph_field::MorphField;
use crate::engine::morph::state_machine::MorphStateMachine;
use crate::engine::tuning::MorphTuning;
use constants::scene::{ORNAMENT_CUBE_SIZE, ORNAMENT_SPHERE_RADIUS};

/// Rendered ornament; the index points into the field's ornament array.
#[derive(Component, Debug, Clone, Copy)]
pub struct OrnamentView(pub usize);

fn ornament_material(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        emissive: color.to_linear() * 0.4,
        metallic: 0.6,
        perceptual_roughness: 0.25,
        ..default()
    }
}

/// One entity per ornament, sharing a mesh per kind and a material per colour.
pub fn spawn_ornaments(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    field: &MorphField,
) {
    let sphere = meshes.add(Sphere::new(ORNAMENT_SPHERE_RADIUS));
    let cube = meshes.add(Cuboid::from_length(ORNAMENT_CUBE_SIZE));
    let mut palette: Vec<(Color, Handle<StandardMaterial>)> = Vec::new();

    for ornament in field.ornaments() {
        let material = match palette.iter().find(|(color, _)| *color == ornament.color) {
            Some((_, handle)) => handle.clone(),
            None => {
                let handle = materials.add(ornament_material(ornament.color));
                palette.push((ornament.color, handle.clone()));
                handle
            }
        };
        let mesh = match ornament.kind {
            OrnamentKind::Sphere => sphere.clone(),
            OrnamentKind::Cube => cube.clone(),
        };

        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(ornament.path().current_position()),
            OrnamentView(ornament.index),
        ));
    }
    info!("Spawned {} ornaments", field.ornaments().len());
}

/// Ornaments share the cloud's rotation about the trunk.
pub fn sync_ornaments(
    field: Res<MorphField>,
    machine: Res<MorphStateMachine>,
    tuning: Res<MorphTuning>,
    mut views: Query<(&OrnamentView, &mut Transform)>,
) {
    let rotation = Quat::from_rotation_y(field.rotation());
    for (view, mut transform) in &mut views {
        let Some(ornament) = field.ornaments().get(view.0) else {
            continue;
        };
        let local = field.ornament_transform(ornament, machine.state(), &tuning.motion);
        *transform = Transform {
            translation: rotation * local.translation,
            rotation: rotation * local.rotation,
            scale: local.scale,
        };
    }
}
