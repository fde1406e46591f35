use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::engine::field::elements::{
    GroundSparkle, MorphPath, OrnamentInstance, OrnamentKind, Particle, PhotoId, PhotoPanel,
    TextureRef, TreeTopper,
};
use crate::engine::field::interpolation::{
    MotionTuning, approach_scalar, jitter_offset, smoothing_factor,
};
use crate::engine::field::photos::{GalleryTuning, nearest_panel, panel_transform};
use crate::engine::geometry::sampler::{
    ConeShape, RibbonShape, cone_spiral_point, cone_surface_point, ground_scatter_point,
    uniform_point_in_sphere,
};
use crate::engine::morph::state_machine::{MorphState, MorphStateMachine};
use crate::engine::tuning::MorphTuning;
use constants::motion::MAX_FRAME_DELTA;
use constants::palette::{DEEP_PINK, GOLD, LUXURY_GOLD, PINK, PINK_GLOW};
use constants::scene::{
    ORNAMENT_CUBE_SHARE, ORNAMENT_PRIMARY_SHARE, PARTICLE_PRIMARY_SHARE, PARTICLE_SIZE_MAX,
    PARTICLE_SIZE_MIN, SCATTER_CENTER, TOPPER_SPIN_SPEED, TOPPER_TREE_POSITION, TREE_HEIGHT,
};

/// Owns every morphing element and advances them toward the active formation.
///
/// Photo panels double as the panel registry the camera queries for focus
/// targets, so nothing outside the field walks the scene graph for them.
#[derive(Resource, Debug, Default)]
pub struct MorphField {
    particles: Vec<Particle>,
    ornaments: Vec<OrnamentInstance>,
    photos: Vec<PhotoPanel>,
    topper: Option<TreeTopper>,
    sparkles: Vec<GroundSparkle>,
    cone: ConeShape,
    ribbon: RibbonShape,
    gallery: GalleryTuning,
    rotation: f32,
    elapsed: f32,
}

impl MorphField {
    /// Samples every element once. Photos are added separately as they arrive.
    pub fn build<R: Rng>(rng: &mut R, tuning: &MorphTuning) -> Self {
        let formation = &tuning.formation;
        let cone = formation.cone;

        let particles = (0..tuning.counts.particles)
            .map(|index| Particle {
                index,
                path: MorphPath::new(
                    SCATTER_CENTER + uniform_point_in_sphere(rng, formation.particle_scatter_radius),
                    cone_spiral_point(rng, &cone),
                ),
                color: if rng.random_bool(PARTICLE_PRIMARY_SHARE) {
                    PINK
                } else {
                    GOLD
                },
                size: rng.random_range(PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX),
                phase: rng.random::<f32>() * TAU,
            })
            .collect();

        let ornaments = (0..tuning.counts.ornaments)
            .map(|index| OrnamentInstance {
                index,
                path: MorphPath::new(
                    SCATTER_CENTER + uniform_point_in_sphere(rng, formation.ornament_scatter_radius),
                    cone_surface_point(rng, &cone),
                ),
                color: if rng.random_bool(ORNAMENT_PRIMARY_SHARE) {
                    DEEP_PINK
                } else {
                    LUXURY_GOLD
                },
                kind: if rng.random_bool(ORNAMENT_CUBE_SHARE) {
                    OrnamentKind::Cube
                } else {
                    OrnamentKind::Sphere
                },
                phase: rng.random::<f32>() * TAU,
            })
            .collect();

        let sparkles = (0..tuning.counts.ground_sparkles)
            .map(|_| GroundSparkle {
                position: ground_scatter_point(
                    rng,
                    formation.ground_ring_inner_radius,
                    formation.ground_ring_width,
                ),
                color: if rng.random_bool(0.5) { PINK_GLOW } else { GOLD },
                size: rng.random_range(PARTICLE_SIZE_MIN..=PARTICLE_SIZE_MAX),
            })
            .collect();

        // The topper keeps its clearance above the apex when the cone is retuned.
        let topper_tree = Vec3::Y * (cone.height + TOPPER_TREE_POSITION.y - TREE_HEIGHT);

        Self {
            particles,
            ornaments,
            photos: Vec::new(),
            topper: Some(TreeTopper {
                path: MorphPath::new(SCATTER_CENTER, topper_tree),
                spin: 0.0,
            }),
            sparkles,
            cone,
            ribbon: formation.ribbon,
            gallery: tuning.photos.clone(),
            rotation: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn ornaments(&self) -> &[OrnamentInstance] {
        &self.ornaments
    }

    pub fn photos(&self) -> &[PhotoPanel] {
        &self.photos
    }

    pub fn topper(&self) -> Option<&TreeTopper> {
        self.topper.as_ref()
    }

    pub fn sparkles(&self) -> &[GroundSparkle] {
        &self.sparkles
    }

    pub fn photo(&self, id: &PhotoId) -> Option<&PhotoPanel> {
        self.photos.iter().find(|panel| &panel.id == id)
    }

    /// Whole-cloud rotation about +Y (radians).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Appends a panel and returns its slot, or `None` if the id is taken.
    ///
    /// The tree target is sampled once here. Under the reflow layout every
    /// existing panel's scatter target is recomputed for the new total.
    pub fn add_photo<R: Rng>(&mut self, rng: &mut R, id: PhotoId, url: String) -> Option<usize> {
        if self.photo(&id).is_some() {
            return None;
        }

        let slot = self.photos.len();
        let total = slot + 1;
        let scatter = self.gallery.scatter_position(slot, total, &self.ribbon);
        let tree = cone_surface_point(rng, &self.cone);

        self.photos.push(PhotoPanel {
            id,
            url,
            texture: TextureRef::Pending,
            slot,
            path: MorphPath::new(scatter, tree),
            focused: false,
            focus_weight: 0.0,
        });
        self.reflow_gallery();

        Some(slot)
    }

    fn reflow_gallery(&mut self) {
        let total = self.photos.len();
        for panel in &mut self.photos {
            let scatter = self.gallery.scatter_position(panel.slot, total, &self.ribbon);
            panel.path.retarget_scatter(scatter);
        }
    }

    /// Records a texture load outcome. Returns whether anything changed.
    pub fn set_texture_state(&mut self, id: &PhotoId, texture: TextureRef) -> bool {
        match self.photos.iter_mut().find(|panel| &panel.id == id) {
            Some(panel) if panel.texture != texture => {
                panel.texture = texture;
                true
            }
            _ => false,
        }
    }

    /// Marks at most one panel as focused; `None` clears the focus.
    pub fn set_focus(&mut self, id: Option<&PhotoId>) {
        for panel in &mut self.photos {
            panel.focused = Some(&panel.id) == id;
        }
    }

    pub fn focused_photo(&self) -> Option<&PhotoId> {
        self.photos
            .iter()
            .find(|panel| panel.focused)
            .map(|panel| &panel.id)
    }

    /// Registry lookup for the camera's focus target.
    pub fn nearest_photo(&self, eye: Vec3) -> Option<(&PhotoId, Vec3)> {
        nearest_panel(&self.photos, eye)
    }

    /// Advances every element one frame of `dt` seconds toward `state`.
    pub fn step(&mut self, state: MorphState, dt: f32, motion: &MotionTuning) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.elapsed += dt;
        self.rotation = (self.rotation + motion.field_rotation_speed * dt).rem_euclid(TAU);

        let factor = smoothing_factor(motion.particles.for_state(state), dt);
        for particle in &mut self.particles {
            particle.path.advance(state, factor);
        }

        let factor = smoothing_factor(motion.ornaments.for_state(state), dt);
        for ornament in &mut self.ornaments {
            ornament.path.advance(state, factor);
        }

        let factor = smoothing_factor(motion.photos.for_state(state), dt);
        let focus_factor = smoothing_factor(motion.focus_smoothing, dt);
        for panel in &mut self.photos {
            panel.path.advance(state, factor);
            let target = if panel.focused { 1.0 } else { 0.0 };
            panel.focus_weight = approach_scalar(panel.focus_weight, target, focus_factor);
        }

        if let Some(topper) = &mut self.topper {
            let factor = smoothing_factor(motion.topper.for_state(state), dt);
            topper.path.advance(state, factor);
            topper.spin = (topper.spin + TOPPER_SPIN_SPEED * dt).rem_euclid(TAU);
        }
    }

    /// Largest remaining distance between any element and its target.
    pub fn max_distance_to_target(&self, state: MorphState) -> f32 {
        let particles = self.particles.iter().map(|p| p.path.distance_to_target(state));
        let ornaments = self.ornaments.iter().map(|o| o.path.distance_to_target(state));
        let photos = self.photos.iter().map(|p| p.path.distance_to_target(state));
        let topper = self.topper.iter().map(|t| t.path.distance_to_target(state));

        particles
            .chain(ornaments)
            .chain(photos)
            .chain(topper)
            .fold(0.0, f32::max)
    }

    /// Emitted particle positions in cloud-local space (rotation excluded).
    pub fn particle_positions<'a>(
        &'a self,
        state: MorphState,
        motion: &'a MotionTuning,
    ) -> impl Iterator<Item = Vec3> + 'a {
        self.particles.iter().map(move |particle| {
            particle.path.current_position()
                + jitter_offset(state, self.elapsed, particle.phase, motion)
        })
    }

    pub fn ornament_transform(
        &self,
        ornament: &OrnamentInstance,
        state: MorphState,
        motion: &MotionTuning,
    ) -> Transform {
        let position = ornament.path.current_position()
            + jitter_offset(state, self.elapsed, ornament.phase, motion);
        Transform::from_translation(position).with_rotation(Quat::from_euler(
            EulerRot::YXZ,
            ornament.phase,
            ornament.phase * 0.5,
            0.0,
        ))
    }

    pub fn photo_transform(
        &self,
        panel: &PhotoPanel,
        state: MorphState,
        eye: Vec3,
        motion: &MotionTuning,
    ) -> Transform {
        let jitter = jitter_offset(state, self.elapsed, panel.slot as f32, motion);
        panel_transform(panel, state, eye, jitter, motion)
    }

    pub fn topper_transform(&self) -> Option<Transform> {
        self.topper.as_ref().map(|topper| {
            Transform::from_translation(topper.path.current_position())
                .with_rotation(Quat::from_rotation_y(topper.spin))
        })
    }
}

/// Per-frame interpolation step for the whole field.
pub fn advance_field(
    mut field: ResMut<MorphField>,
    machine: Res<MorphStateMachine>,
    tuning: Res<MorphTuning>,
    time: Res<Time>,
) {
    field.step(machine.state(), time.delta_secs(), &tuning.motion);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::field::photos::PhotoLayout;
    use crate::engine::tuning::ElementCounts;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    const FRAME: f32 = 1.0 / 60.0;

    fn small_tuning() -> MorphTuning {
        MorphTuning {
            counts: ElementCounts {
                particles: 300,
                ornaments: 20,
                ground_sparkles: 10,
            },
            ..default()
        }
    }

    fn field(tuning: &MorphTuning) -> (MorphField, Pcg64Mcg) {
        let mut rng = Pcg64Mcg::seed_from_u64(99);
        let field = MorphField::build(&mut rng, tuning);
        (field, rng)
    }

    #[test]
    fn build_honours_counts_and_starts_scattered() {
        let tuning = small_tuning();
        let (field, _) = field(&tuning);
        assert_eq!(field.particles().len(), 300);
        assert_eq!(field.ornaments().len(), 20);
        assert_eq!(field.sparkles().len(), 10);
        assert_eq!(field.max_distance_to_target(MorphState::Scattered), 0.0);
    }

    #[test]
    fn same_seed_builds_same_field() {
        let tuning = small_tuning();
        let (a, _) = field(&tuning);
        let (b, _) = field(&tuning);
        let first = |f: &MorphField| f.particles()[17].path().tree_position();
        assert_eq!(first(&a), first(&b));
    }

    #[test]
    fn step_converges_and_targets_stay_fixed() {
        let tuning = small_tuning();
        let (mut field, _) = field(&tuning);
        let before: Vec<(Vec3, Vec3)> = field
            .particles()
            .iter()
            .map(|p| (p.path().scatter_position(), p.path().tree_position()))
            .collect();

        for _ in 0..600 {
            field.step(MorphState::TreeShape, FRAME, &tuning.motion);
        }

        assert!(field.max_distance_to_target(MorphState::TreeShape) < 1e-3);
        for (particle, (scatter, tree)) in field.particles().iter().zip(before) {
            assert_eq!(particle.path().scatter_position(), scatter);
            assert_eq!(particle.path().tree_position(), tree);
        }
    }

    #[test]
    fn reflow_layout_moves_existing_scatter_targets() {
        let tuning = small_tuning();
        let (mut field, mut rng) = field(&tuning);
        field.add_photo(&mut rng, "a".into(), "a.png".into());
        field.add_photo(&mut rng, "b".into(), "b.png".into());
        let scatter_before = field.photos()[1].path().scatter_position();
        let tree_before = field.photos()[1].path().tree_position();

        field.add_photo(&mut rng, "c".into(), "c.png".into());

        assert_ne!(field.photos()[1].path().scatter_position(), scatter_before);
        assert_eq!(field.photos()[1].path().tree_position(), tree_before);
    }

    #[test]
    fn stable_layout_keeps_existing_scatter_targets() {
        let mut tuning = small_tuning();
        tuning.photos.layout = PhotoLayout::StableSlots;
        let (mut field, mut rng) = field(&tuning);
        field.add_photo(&mut rng, "a".into(), "a.png".into());
        field.add_photo(&mut rng, "b".into(), "b.png".into());
        let before = field.photos()[1].path().scatter_position();

        field.add_photo(&mut rng, "c".into(), "c.png".into());

        assert_eq!(field.photos()[1].path().scatter_position(), before);
    }

    #[test]
    fn duplicate_photo_ids_are_rejected() {
        let tuning = small_tuning();
        let (mut field, mut rng) = field(&tuning);
        assert_eq!(field.add_photo(&mut rng, "a".into(), "a.png".into()), Some(0));
        assert_eq!(field.add_photo(&mut rng, "a".into(), "other.png".into()), None);
        assert_eq!(field.photos().len(), 1);
    }

    #[test]
    fn new_photo_joins_an_assembled_tree() {
        let tuning = small_tuning();
        let (mut field, mut rng) = field(&tuning);
        for _ in 0..600 {
            field.step(MorphState::TreeShape, FRAME, &tuning.motion);
        }
        field.add_photo(&mut rng, "late".into(), "late.png".into());
        let panel = &field.photos()[0];
        assert_eq!(panel.path().current_position(), panel.path().scatter_position());

        for _ in 0..600 {
            field.step(MorphState::TreeShape, FRAME, &tuning.motion);
        }
        assert!(field.max_distance_to_target(MorphState::TreeShape) < 1e-3);
    }

    #[test]
    fn focus_weight_rises_smoothly_and_scales_the_panel() {
        let tuning = small_tuning();
        let (mut field, mut rng) = field(&tuning);
        field.add_photo(&mut rng, "a".into(), "a.png".into());
        let id = PhotoId::from("a");
        field.set_focus(Some(&id));
        assert_eq!(field.focused_photo(), Some(&id));

        field.step(MorphState::Scattered, FRAME, &tuning.motion);
        let first = field.photos()[0].focus_weight();
        assert!(first > 0.0 && first < 0.2);

        for _ in 0..300 {
            field.step(MorphState::Scattered, FRAME, &tuning.motion);
        }
        let eye = Vec3::new(0.0, 5.0, 22.0);
        let transform =
            field.photo_transform(&field.photos()[0], MorphState::Scattered, eye, &tuning.motion);
        assert!((transform.scale.x - tuning.motion.focus_scale).abs() < 1e-2);

        field.set_focus(None);
        assert_eq!(field.focused_photo(), None);
    }

    #[test]
    fn nearest_photo_uses_the_registry() {
        let tuning = small_tuning();
        let (mut field, mut rng) = field(&tuning);
        assert!(field.nearest_photo(Vec3::ZERO).is_none());

        for id in ["a", "b", "c", "d"] {
            field.add_photo(&mut rng, id.into(), format!("{id}.png"));
        }
        let eye = field.photos()[2].path().current_position() + Vec3::X * 0.1;
        let (id, _) = field.nearest_photo(eye).expect("panels were added");
        assert_eq!(id, &PhotoId::from("c"));
    }

    #[test]
    fn texture_state_reports_changes_only() {
        let tuning = small_tuning();
        let (mut field, mut rng) = field(&tuning);
        field.add_photo(&mut rng, "a".into(), "a.png".into());
        let id = PhotoId::from("a");
        assert!(field.set_texture_state(&id, TextureRef::Failed));
        assert!(!field.set_texture_state(&id, TextureRef::Failed));
        assert!(!field.set_texture_state(&PhotoId::from("missing"), TextureRef::Loaded));
    }

    #[test]
    fn huge_frame_delta_is_clamped() {
        let tuning = small_tuning();
        let (mut field, _) = field(&tuning);
        field.step(MorphState::TreeShape, 30.0, &tuning.motion);
        assert!(field.max_distance_to_target(MorphState::TreeShape) > 0.0);
        assert!(field.elapsed() <= MAX_FRAME_DELTA);
    }
}
