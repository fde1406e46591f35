use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::gesture::classifier::GestureKind;

/// Which formation the field converges on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MorphState {
    #[default]
    Scattered,
    TreeShape,
}

impl MorphState {
    pub fn opposite(self) -> Self {
        match self {
            Self::Scattered => Self::TreeShape,
            Self::TreeShape => Self::Scattered,
        }
    }

    /// Convert string identifier to a state for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SCATTERED" => Some(Self::Scattered),
            "TREE_SHAPE" | "TREE" => Some(Self::TreeShape),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scattered => "SCATTERED",
            Self::TreeShape => "TREE_SHAPE",
        }
    }
}

/// A state change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphTransition {
    pub from: MorphState,
    pub to: MorphState,
}

/// Resource holding the single live formation.
///
/// Every mutator returns the transition it caused, or `None` when the call was
/// a no-op, mirroring how tool activation reports whether anything changed.
#[derive(Resource, Debug, Default)]
pub struct MorphStateMachine {
    state: MorphState,
    transitions: u64,
}

impl MorphStateMachine {
    pub fn state(&self) -> MorphState {
        self.state
    }

    /// Number of transitions since startup.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Flips to the other formation unconditionally.
    pub fn toggle(&mut self) -> MorphTransition {
        let from = self.state;
        self.apply(from.opposite());
        MorphTransition {
            from,
            to: self.state,
        }
    }

    /// Idempotent assignment.
    pub fn set(&mut self, target: MorphState) -> Option<MorphTransition> {
        if self.state == target {
            return None;
        }

        let from = self.state;
        self.apply(target);
        Some(MorphTransition { from, to: target })
    }

    /// Reacts to the first frame of a new gesture. FIST assembles, OPEN
    /// disperses, everything else is ignored.
    pub fn on_gesture_edge(&mut self, gesture: GestureKind) -> Option<MorphTransition> {
        match gesture {
            GestureKind::Fist => self.set(MorphState::TreeShape),
            GestureKind::Open => self.set(MorphState::Scattered),
            GestureKind::None | GestureKind::Point => None,
        }
    }

    fn apply(&mut self, next: MorphState) {
        self.state = next;
        self.transitions += 1;
    }
}

/// Who asked for a morph change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Keyboard,
    Rpc,
    Gesture,
    Intro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphAction {
    Toggle,
    Set(MorphState),
}

/// Explicit morph request from the keyboard, the RPC bridge or the intro timer.
#[derive(Event, Debug, Clone, Copy)]
pub struct MorphCommand {
    pub action: MorphAction,
    pub source: CommandSource,
}

/// Fired once per actual transition.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphStateChanged {
    pub from: MorphState,
    pub to: MorphState,
    pub source: CommandSource,
}
