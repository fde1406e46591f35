use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::field::elements::PhotoId;
use crate::engine::field::interpolation::{approach, approach_scalar, smoothing_factor};
use crate::engine::field::morph_field::MorphField;
use crate::engine::gesture::classifier::{GestureKind, GestureSample};
use crate::engine::morph::state_machine::{MorphState, MorphStateMachine};
use crate::engine::tracking::systems::CurrentGesture;
use crate::engine::tuning::MorphTuning;
use constants::camera::{
    AUTO_ROTATE_SPEED_SCATTERED, AUTO_ROTATE_SPEED_TREE, AZIMUTH_SMOOTHING, DEFAULT_DISTANCE,
    DEFAULT_ELEVATION, DEFAULT_TARGET, DISTANCE_SMOOTHING, FIELD_OF_VIEW_DEGREES,
    FOCUS_TARGET_SMOOTHING, IDLE_TARGET_SMOOTHING, MAX_DISTANCE, MIN_DISTANCE, POINTER_DEPTH_MAX,
    POINTER_DEPTH_MIN, POINTER_ROTATION_RANGE, ZOOM_DISTANCE_FAR, ZOOM_DISTANCE_NEAR,
};
use constants::motion::MAX_FRAME_DELTA;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    #[serde(skip, default = "default_look_at")]
    pub default_target: Vec3,
    pub default_distance: f32,
    /// Fixed orbit elevation (radians).
    pub elevation: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Idle auto-rotation per formation (radians per second).
    pub auto_rotate_tree: f32,
    pub auto_rotate_scattered: f32,
    pub pointer_rotation_range: f32,
    pub pointer_depth_min: f32,
    pub pointer_depth_max: f32,
    pub zoom_near: f32,
    pub zoom_far: f32,
    pub azimuth_smoothing: f32,
    pub distance_smoothing: f32,
    pub focus_target_smoothing: f32,
    pub idle_target_smoothing: f32,
    pub field_of_view_degrees: f32,
}

fn default_look_at() -> Vec3 {
    DEFAULT_TARGET
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            default_target: DEFAULT_TARGET,
            default_distance: DEFAULT_DISTANCE,
            elevation: DEFAULT_ELEVATION,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            auto_rotate_tree: AUTO_ROTATE_SPEED_TREE,
            auto_rotate_scattered: AUTO_ROTATE_SPEED_SCATTERED,
            pointer_rotation_range: POINTER_ROTATION_RANGE,
            pointer_depth_min: POINTER_DEPTH_MIN,
            pointer_depth_max: POINTER_DEPTH_MAX,
            zoom_near: ZOOM_DISTANCE_NEAR,
            zoom_far: ZOOM_DISTANCE_FAR,
            azimuth_smoothing: AZIMUTH_SMOOTHING,
            distance_smoothing: DISTANCE_SMOOTHING,
            focus_target_smoothing: FOCUS_TARGET_SMOOTHING,
            idle_target_smoothing: IDLE_TARGET_SMOOTHING,
            field_of_view_degrees: FIELD_OF_VIEW_DEGREES,
        }
    }
}

impl CameraTuning {
    fn clamp_distance(&self, distance: f32) -> f32 {
        let (low, high) = if self.min_distance <= self.max_distance {
            (self.min_distance, self.max_distance)
        } else {
            (self.max_distance, self.min_distance)
        };
        distance.clamp(low, high)
    }

    /// Pointer depth mapped linearly onto the zoom range, clamped at both ends.
    pub fn zoom_for_depth(&self, depth: f32) -> f32 {
        let span = self.pointer_depth_max - self.pointer_depth_min;
        let t = if span.abs() > f32::EPSILON && depth.is_finite() {
            ((depth - self.pointer_depth_min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.clamp_distance(self.zoom_near + (self.zoom_far - self.zoom_near) * t)
    }

    /// Pointer x mapped onto the azimuth range, centred on zero.
    pub fn azimuth_for_pointer(&self, x: f32) -> f32 {
        (x - 0.5) * self.pointer_rotation_range
    }
}

/// Wraps an angle into `[-PI, PI)`.
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Orbit pose owned by the camera controller.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub azimuth: f32,
    pub target: Vec3,
    pub distance: f32,
    pub elevation: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_tuning(&CameraTuning::default())
    }
}

impl OrbitCamera {
    pub fn from_tuning(tuning: &CameraTuning) -> Self {
        Self {
            azimuth: 0.0,
            target: tuning.default_target,
            distance: tuning.clamp_distance(tuning.default_distance),
            elevation: tuning.elevation,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        self.target + self.distance * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    /// Advances the pose one frame and returns the photo that should hold
    /// focus, if any.
    pub fn update(
        &mut self,
        gesture: &GestureSample,
        state: MorphState,
        field: &MorphField,
        dt: f32,
        tuning: &CameraTuning,
    ) -> Option<PhotoId> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };

        let focus = match gesture.kind {
            GestureKind::Open => {
                self.steer(gesture.pointer, dt, tuning);
                None
            }
            GestureKind::Point => match field.nearest_photo(self.eye()) {
                Some((id, position)) => {
                    let factor = smoothing_factor(tuning.focus_target_smoothing, dt);
                    self.target = approach(self.target, position, factor);
                    Some(id.clone())
                }
                None => {
                    self.idle(state, dt, tuning);
                    None
                }
            },
            GestureKind::None | GestureKind::Fist => {
                self.idle(state, dt, tuning);
                None
            }
        };

        self.distance = tuning.clamp_distance(self.distance);
        focus
    }

    fn idle(&mut self, state: MorphState, dt: f32, tuning: &CameraTuning) {
        let speed = match state {
            MorphState::TreeShape => tuning.auto_rotate_tree,
            MorphState::Scattered => tuning.auto_rotate_scattered,
        };
        self.azimuth = wrap_angle(self.azimuth + speed * dt);

        let factor = smoothing_factor(tuning.idle_target_smoothing, dt);
        self.target = approach(self.target, tuning.default_target, factor);
    }

    fn steer(&mut self, pointer: Vec3, dt: f32, tuning: &CameraTuning) {
        let goal = tuning.azimuth_for_pointer(pointer.x);
        let delta = wrap_angle(goal - self.azimuth);
        let factor = smoothing_factor(tuning.azimuth_smoothing, dt);
        self.azimuth = wrap_angle(self.azimuth + delta * factor);

        let zoom = tuning.zoom_for_depth(pointer.z);
        let factor = smoothing_factor(tuning.distance_smoothing, dt);
        self.distance = approach_scalar(self.distance, zoom, factor);
    }
}

/// Drives the main camera from the current gesture and hands the focus
/// decision to the field.
pub fn orbit_camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mut field: ResMut<MorphField>,
    gesture: Res<CurrentGesture>,
    machine: Res<MorphStateMachine>,
    tuning: Res<MorphTuning>,
    time: Res<Time>,
) {
    let focus = orbit.update(
        &gesture.0,
        machine.state(),
        &field,
        time.delta_secs(),
        &tuning.camera,
    );

    if field.focused_photo() != focus.as_ref() {
        field.set_focus(focus.as_ref());
    }

    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tuning::{ElementCounts, MorphTuning};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    const FRAME: f32 = 1.0 / 60.0;

    fn empty_field() -> MorphField {
        let tuning = MorphTuning {
            counts: ElementCounts {
                particles: 0,
                ornaments: 0,
                ground_sparkles: 0,
            },
            ..default()
        };
        MorphField::build(&mut Pcg64Mcg::seed_from_u64(1), &tuning)
    }

    fn open(x: f32, z: f32) -> GestureSample {
        GestureSample::new(GestureKind::Open, Vec3::new(x, 0.5, z))
    }

    #[test]
    fn default_eye_sits_in_front_of_the_tree() {
        let camera = OrbitCamera::default();
        let eye = camera.eye();
        assert!((eye.distance(camera.target) - DEFAULT_DISTANCE).abs() < 1e-4);
        assert!(eye.z > 20.0 && eye.y > camera.target.y);
    }

    #[test]
    fn idle_auto_rotates_faster_when_assembled() {
        let tuning = CameraTuning::default();
        let field = empty_field();
        let mut scattered = OrbitCamera::default();
        let mut tree = OrbitCamera::default();
        scattered.update(&GestureSample::NEUTRAL, MorphState::Scattered, &field, 1.0 / 60.0, &tuning);
        tree.update(&GestureSample::NEUTRAL, MorphState::TreeShape, &field, 1.0 / 60.0, &tuning);
        assert!(tree.azimuth > scattered.azimuth && scattered.azimuth > 0.0);
    }

    #[test]
    fn open_approaches_mapped_azimuth_without_jumping() {
        let tuning = CameraTuning::default();
        let field = empty_field();
        let mut camera = OrbitCamera::default();
        let sample = open(0.75, 0.0);
        let goal = tuning.azimuth_for_pointer(0.75);

        camera.update(&sample, MorphState::Scattered, &field, FRAME, &tuning);
        assert!(camera.azimuth > 0.0);
        assert!(camera.azimuth < goal * 0.1);

        for _ in 0..600 {
            camera.update(&sample, MorphState::Scattered, &field, FRAME, &tuning);
        }
        assert!((camera.azimuth - goal).abs() < 1e-3);
    }

    #[test]
    fn open_takes_the_short_way_round() {
        let tuning = CameraTuning::default();
        let field = empty_field();
        let mut camera = OrbitCamera {
            azimuth: 3.0,
            ..default()
        };
        // Goal just past -PI: shortest path continues upward through PI.
        camera.update(&open(0.01, 0.0), MorphState::Scattered, &field, FRAME, &tuning);
        assert!(camera.azimuth > 3.0 || camera.azimuth < -3.0);
    }

    #[test]
    fn zoom_follows_depth_and_stays_in_range() {
        let tuning = CameraTuning::default();
        let field = empty_field();
        let mut camera = OrbitCamera::default();

        for _ in 0..600 {
            camera.update(&open(0.5, 1.0), MorphState::Scattered, &field, FRAME, &tuning);
            assert!(camera.distance >= tuning.min_distance && camera.distance <= tuning.max_distance);
        }
        assert!((camera.distance - ZOOM_DISTANCE_FAR).abs() < 1e-2);
        assert_eq!(tuning.zoom_for_depth(-5.0), ZOOM_DISTANCE_NEAR);
        assert_eq!(tuning.zoom_for_depth(f32::NAN), tuning.zoom_for_depth(0.0));
    }

    #[test]
    fn point_moves_target_to_nearest_panel_and_focuses_it() {
        let tuning = CameraTuning::default();
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let mut field = empty_field();
        for id in ["a", "b", "c"] {
            field.add_photo(&mut rng, id.into(), format!("{id}.jpg"));
        }
        let mut camera = OrbitCamera::default();
        let point = GestureSample::new(GestureKind::Point, Vec3::splat(0.5));

        let (nearest, position) = field
            .nearest_photo(camera.eye())
            .map(|(id, p)| (id.clone(), p))
            .expect("panels exist");
        let before = camera.target.distance(position);

        let focus = camera.update(&point, MorphState::Scattered, &field, FRAME, &tuning);
        assert_eq!(focus, Some(nearest));
        assert!(camera.target.distance(position) < before);
    }

    #[test]
    fn point_without_panels_behaves_like_idle() {
        let tuning = CameraTuning::default();
        let field = empty_field();
        let mut camera = OrbitCamera::default();
        let point = GestureSample::new(GestureKind::Point, Vec3::splat(0.5));
        assert_eq!(camera.update(&point, MorphState::Scattered, &field, FRAME, &tuning), None);
        assert!(camera.azimuth > 0.0);
    }

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        for angle in [-10.0, -PI, 0.0, PI, 7.5, 100.0] {
            let wrapped = wrap_angle(angle);
            assert!((-PI..PI).contains(&wrapped), "{angle} wrapped to {wrapped}");
        }
    }
}
