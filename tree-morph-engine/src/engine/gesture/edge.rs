use bevy::prelude::*;

use crate::engine::gesture::classifier::GestureKind;

/// Remembers the previous gesture kind and reports only changes.
#[derive(Resource, Debug, Default)]
pub struct GestureEdgeDetector {
    previous: GestureKind,
}

impl GestureEdgeDetector {
    /// Returns `Some(kind)` on the first frame a new kind is observed.
    pub fn observe(&mut self, kind: GestureKind) -> Option<GestureKind> {
        if kind == self.previous {
            return None;
        }

        self.previous = kind;
        Some(kind)
    }
}
