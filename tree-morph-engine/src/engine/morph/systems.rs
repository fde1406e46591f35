use bevy::prelude::*;

use crate::engine::gesture::edge::GestureEdgeDetector;
use crate::engine::morph::state_machine::{
    CommandSource, MorphAction, MorphCommand, MorphState, MorphStateChanged, MorphStateMachine,
    MorphTransition,
};
use crate::engine::tracking::systems::CurrentGesture;
use crate::engine::tuning::MorphTuning;

/// One-shot timer assembling the tree shortly after the scene starts.
#[derive(Resource, Debug, Default)]
pub struct IntroAssemble {
    timer: Option<Timer>,
}

impl IntroAssemble {
    /// A negative or non-finite delay disables the intro.
    pub fn after_secs(delay: f32) -> Self {
        let timer = (delay.is_finite() && delay >= 0.0)
            .then(|| Timer::from_seconds(delay, TimerMode::Once));
        Self { timer }
    }
}

fn announce(
    transition: MorphTransition,
    source: CommandSource,
    changed: &mut EventWriter<MorphStateChanged>,
) {
    info!(
        "Morph {} → {} via {:?}",
        transition.from.as_str(),
        transition.to.as_str(),
        source
    );
    changed.write(MorphStateChanged {
        from: transition.from,
        to: transition.to,
        source,
    });
}

/// Applies explicit commands from the keyboard, RPC and intro timer.
pub fn handle_morph_commands(
    mut commands: EventReader<MorphCommand>,
    mut machine: ResMut<MorphStateMachine>,
    mut changed: EventWriter<MorphStateChanged>,
) {
    for command in commands.read() {
        let transition = match command.action {
            MorphAction::Toggle => Some(machine.toggle()),
            MorphAction::Set(state) => machine.set(state),
        };

        if let Some(transition) = transition {
            announce(transition, command.source, &mut changed);
        }
    }
}

/// Feeds gesture changes, never held gestures, into the machine.
pub fn apply_gesture_edges(
    gesture: Res<CurrentGesture>,
    mut detector: ResMut<GestureEdgeDetector>,
    mut machine: ResMut<MorphStateMachine>,
    mut changed: EventWriter<MorphStateChanged>,
) {
    let Some(edge) = detector.observe(gesture.0.kind) else {
        return;
    };

    if let Some(transition) = machine.on_gesture_edge(edge) {
        announce(transition, CommandSource::Gesture, &mut changed);
    }
}

pub fn setup_intro_assemble(mut commands: Commands, tuning: Res<MorphTuning>) {
    commands.insert_resource(IntroAssemble::after_secs(tuning.intro_assemble_delay_secs));
}

/// Assembles the tree once the intro delay elapses, unless the user already
/// changed the formation.
pub fn intro_auto_assemble(
    mut intro: ResMut<IntroAssemble>,
    machine: Res<MorphStateMachine>,
    time: Res<Time>,
    mut commands: EventWriter<MorphCommand>,
) {
    let Some(timer) = intro.timer.as_mut() else {
        return;
    };

    if !timer.tick(time.delta()).finished() {
        return;
    }

    intro.timer = None;
    if machine.transition_count() == 0 {
        commands.write(MorphCommand {
            action: MorphAction::Set(MorphState::TreeShape),
            source: CommandSource::Intro,
        });
    }
}
