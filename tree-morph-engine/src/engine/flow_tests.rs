//! End-to-end runs of the headless runtime: landmark frames in, converged
//! element positions out.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use crate::engine::core::app_state::AppState;
use crate::engine::core::runtime_plugin::MorphRuntimePlugin;
use crate::engine::field::elements::PhotoId;
use crate::engine::field::morph_field::MorphField;
use crate::engine::geometry::scene_rng::SceneRng;
use crate::engine::gesture::classifier::GestureKind;
use crate::engine::gesture::classifier::tests::hand_with;
use crate::engine::morph::state_machine::{
    CommandSource, MorphAction, MorphCommand, MorphState, MorphStateMachine,
};
use crate::engine::tracking::session::{RemoteLandmarkFeed, TrackingController};
use crate::engine::tracking::systems::{CurrentGesture, TrackingAction, TrackingRequest};
use crate::engine::tuning::{ElementCounts, MorphTuning};

const EPSILON: f32 = 1e-2;
const FIST: [bool; 4] = [false; 4];
const OPEN: [bool; 4] = [true; 4];
const POINT: [bool; 4] = [true, false, false, false];

fn test_tuning() -> MorphTuning {
    MorphTuning {
        counts: ElementCounts {
            particles: 400,
            ornaments: 30,
            ground_sparkles: 20,
        },
        intro_assemble_delay_secs: -1.0,
        ..default()
    }
}

/// Runtime at 60 fps with the field built and five photos in place.
fn running_app(tuning: MorphTuning) -> App {
    let mut rng = SceneRng::from_seed(tuning.seed);
    let mut field = MorphField::build(&mut rng.0, &tuning);
    for n in 1..=5 {
        field.add_photo(
            &mut rng.0,
            PhotoId(format!("memory-{n}")),
            format!("photos/memory_{n}.jpg"),
        );
    }

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .init_state::<AppState>()
        .insert_resource(tuning)
        .add_plugins(MorphRuntimePlugin)
        .insert_resource(field)
        .insert_resource(rng);

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Running);
    app.update();
    app
}

fn start_remote_tracking(app: &mut App) {
    app.world_mut()
        .resource_mut::<TrackingController>()
        .start(Box::new(RemoteLandmarkFeed));
}

fn show_hand(app: &mut App, raised: [bool; 4], pointer: Vec3) {
    let hand = hand_with(raised, pointer);
    assert!(
        app.world()
            .resource::<TrackingController>()
            .ingest(Some(&hand))
    );
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn state(app: &App) -> MorphState {
    app.world().resource::<MorphStateMachine>().state()
}

fn assert_converged(field: &MorphField, state: MorphState) {
    let target = |scatter: Vec3, tree: Vec3| match state {
        MorphState::Scattered => scatter,
        MorphState::TreeShape => tree,
    };

    for particle in field.particles() {
        let path = particle.path();
        let goal = target(path.scatter_position(), path.tree_position());
        assert!(path.current_position().distance(goal) < EPSILON);
    }
    for ornament in field.ornaments() {
        let path = ornament.path();
        let goal = target(path.scatter_position(), path.tree_position());
        assert!(path.current_position().distance(goal) < EPSILON);
    }
    for panel in field.photos() {
        let path = panel.path();
        let goal = target(path.scatter_position(), path.tree_position());
        assert!(
            path.current_position().distance(goal) < EPSILON,
            "photo {} not converged",
            panel.id
        );
    }
}

#[test]
fn fist_assembles_and_open_disperses_everything() {
    let mut app = running_app(test_tuning());
    assert_eq!(state(&app), MorphState::Scattered);
    assert_eq!(app.world().resource::<MorphField>().photos().len(), 5);

    start_remote_tracking(&mut app);
    show_hand(&mut app, FIST, Vec3::new(0.5, 0.5, 0.0));
    run_frames(&mut app, 700);

    assert_eq!(state(&app), MorphState::TreeShape);
    assert!(app.world().resource::<TrackingController>().status().is_active());
    assert_converged(app.world().resource::<MorphField>(), MorphState::TreeShape);

    show_hand(&mut app, OPEN, Vec3::new(0.8, 0.5, 0.0));
    run_frames(&mut app, 900);

    assert_eq!(state(&app), MorphState::Scattered);
    assert_converged(app.world().resource::<MorphField>(), MorphState::Scattered);
    // One transition per gesture edge, however long each pose was held.
    assert_eq!(app.world().resource::<MorphStateMachine>().transition_count(), 2);
}

#[test]
fn manual_toggle_still_works_when_tracking_is_unavailable() {
    let mut app = running_app(test_tuning());

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No landmark producer is configured in the default tuning.
        app.world_mut().send_event(TrackingRequest {
            action: TrackingAction::Start,
        });
        app.update();
        let controller = app.world().resource::<TrackingController>();
        assert_eq!(controller.status().label(), "unavailable");
        assert!(!controller.status().is_active());
    }

    app.world_mut().send_event(MorphCommand {
        action: MorphAction::Toggle,
        source: CommandSource::Keyboard,
    });
    run_frames(&mut app, 700);

    assert_eq!(state(&app), MorphState::TreeShape);
    assert_eq!(
        app.world().resource::<CurrentGesture>().0.kind,
        GestureKind::None
    );
    assert_converged(app.world().resource::<MorphField>(), MorphState::TreeShape);
}

#[test]
fn pointing_focuses_the_nearest_photo_without_morphing() {
    let mut app = running_app(test_tuning());
    start_remote_tracking(&mut app);
    show_hand(&mut app, POINT, Vec3::new(0.5, 0.5, 0.0));
    run_frames(&mut app, 120);

    let field = app.world().resource::<MorphField>();
    let focused = field.focused_photo().cloned().expect("a photo is focused");
    let panel = field.photo(&focused).expect("focused photo exists");
    assert!(panel.focus_weight() > 0.0);
    assert_eq!(field.photos().iter().filter(|p| p.focused).count(), 1);
    assert_eq!(state(&app), MorphState::Scattered);

    // Dropping the hand releases the focus.
    assert!(app.world().resource::<TrackingController>().ingest(None));
    run_frames(&mut app, 5);
    assert!(app.world().resource::<MorphField>().focused_photo().is_none());
}
