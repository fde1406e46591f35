//! Formation state: which of the two targets every element is heading for.

/// `MorphStateMachine` resource, its commands and change events.
pub mod state_machine;

/// Systems feeding commands, gesture edges and the intro timer into the machine.
pub mod systems;
