use bevy::prelude::*;

use crate::engine::camera::orbit_camera::{OrbitCamera, orbit_camera_controller};
use crate::engine::core::app_state::AppState;
use crate::engine::field::morph_field::{MorphField, advance_field};
use crate::engine::geometry::scene_rng::SceneRng;
use crate::engine::gesture::edge::GestureEdgeDetector;
use crate::engine::gesture::latch::GestureLatch;
use crate::engine::morph::state_machine::{MorphCommand, MorphStateChanged, MorphStateMachine};
use crate::engine::morph::systems::{
    IntroAssemble, apply_gesture_edges, handle_morph_commands, intro_auto_assemble,
    setup_intro_assemble,
};
use crate::engine::tracking::session::TrackingController;
use crate::engine::tracking::systems::{
    CurrentGesture, TrackingRequest, TrackingStatusChanged, autostart_tracking,
    handle_tracking_requests, sample_gesture_latch, supervise_tracking,
};

/// Per-frame phases of the running scene, in order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeSet {
    /// Gesture snapshot, tracking control, user requests.
    Input,
    /// Morph transitions, camera, interpolation.
    Simulate,
    /// Copy field output into entities and notifications.
    Publish,
}

/// Headless core of the running scene: tracking, morph state, camera and
/// field interpolation. Needs `AppState` and a `MorphTuning` resource.
pub struct MorphRuntimePlugin;

impl Plugin for MorphRuntimePlugin {
    fn build(&self, app: &mut App) {
        let latch = GestureLatch::default();

        app.insert_resource(latch.clone())
            .insert_resource(TrackingController::new(latch))
            .init_resource::<CurrentGesture>()
            .init_resource::<GestureEdgeDetector>()
            .init_resource::<MorphStateMachine>()
            .init_resource::<IntroAssemble>()
            .init_resource::<MorphField>()
            .init_resource::<OrbitCamera>()
            .init_resource::<SceneRng>()
            .add_event::<MorphCommand>()
            .add_event::<MorphStateChanged>()
            .add_event::<TrackingRequest>()
            .add_event::<TrackingStatusChanged>();

        app.configure_sets(
            Update,
            (RuntimeSet::Input, RuntimeSet::Simulate, RuntimeSet::Publish)
                .chain()
                .run_if(in_state(AppState::Running)),
        );

        app.add_systems(
            OnEnter(AppState::Running),
            (setup_intro_assemble, autostart_tracking),
        )
        .add_systems(
            Update,
            (sample_gesture_latch, handle_tracking_requests, supervise_tracking)
                .chain()
                .in_set(RuntimeSet::Input),
        )
        .add_systems(
            Update,
            (
                intro_auto_assemble,
                apply_gesture_edges,
                handle_morph_commands,
                orbit_camera_controller,
                advance_field,
            )
                .chain()
                .in_set(RuntimeSet::Simulate),
        );
    }
}
