use bevy::prelude::*;
use bevy::render::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;

/// Two triangles per point.
pub const VERTICES_PER_POINT: usize = 6;

const QUAD_CORNERS: [Vec2; VERTICES_PER_POINT] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
];

/// Writes one quad per `(center, half_size)` spanned by `right` and `up`.
/// `out` is cleared first so its allocation is reused across frames.
pub fn write_billboard_quads(
    points: impl Iterator<Item = (Vec3, f32)>,
    right: Vec3,
    up: Vec3,
    out: &mut Vec<[f32; 3]>,
) {
    out.clear();
    for (center, half_size) in points {
        for corner in QUAD_CORNERS {
            let vertex = center + (right * corner.x + up * corner.y) * half_size;
            out.push(vertex.to_array());
        }
    }
}

/// Builds a triangle-list mesh of quads with per-vertex colours.
///
/// Kept in both worlds so the main world can rewrite positions every frame.
pub fn create_billboard_mesh(
    points: impl Iterator<Item = (Vec3, f32)>,
    colors: impl Iterator<Item = Color>,
    right: Vec3,
    up: Vec3,
) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );

    let mut positions = Vec::new();
    write_billboard_quads(points, right, up, &mut positions);

    let colors: Vec<[f32; 4]> = colors
        .flat_map(|color| {
            let linear = color.to_linear();
            [[linear.red, linear.green, linear.blue, linear.alpha]; VERTICES_PER_POINT]
        })
        .collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

/// Rewrites the quad positions of an existing billboard mesh in place.
/// Returns false if the mesh has no float3 position attribute.
pub fn update_billboard_mesh(
    mesh: &mut Mesh,
    points: impl Iterator<Item = (Vec3, f32)>,
    right: Vec3,
    up: Vec3,
) -> bool {
    match mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) => {
            write_billboard_quads(points, right, up, positions);
            true
        }
        _ => false,
    }
}
