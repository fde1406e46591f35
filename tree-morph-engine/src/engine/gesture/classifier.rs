use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::gesture::landmarks::{Landmark, hand};

/// Discrete hand pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureKind {
    #[default]
    None,
    Fist,
    Open,
    Point,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Fist => "FIST",
            Self::Open => "OPEN",
            Self::Point => "POINT",
        }
    }
}

/// Classified frame: pose plus the pointer the camera steers with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub kind: GestureKind,
    /// Normalised image coordinates of the pointer landmark; `z` is depth.
    pub pointer: Vec3,
}

impl GestureSample {
    /// Emitted for any frame without a usable hand.
    pub const NEUTRAL: Self = Self {
        kind: GestureKind::None,
        pointer: Vec3::new(0.5, 0.5, 0.0),
    };

    pub fn new(kind: GestureKind, pointer: Vec3) -> Self {
        Self { kind, pointer }
    }
}

impl Default for GestureSample {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// (tip, proximal joint) for index, middle, ring and pinky.
const FINGERS: [(usize, usize); 4] = [
    (hand::INDEX_FINGER_TIP, hand::INDEX_FINGER_PIP),
    (hand::MIDDLE_FINGER_TIP, hand::MIDDLE_FINGER_PIP),
    (hand::RING_FINGER_TIP, hand::RING_FINGER_PIP),
    (hand::PINKY_TIP, hand::PINKY_PIP),
];

/// Which of the four non-thumb fingers have their tip above the joint.
/// `None` when the frame is not a complete hand.
pub fn raised_fingers(landmarks: &[Landmark]) -> Option<[bool; 4]> {
    if landmarks.len() < hand::LANDMARK_COUNT {
        return None;
    }

    Some(FINGERS.map(|(tip, joint)| landmarks[tip].y < landmarks[joint].y))
}

/// Classifies one frame. Total: partial, empty or non-finite input yields
/// [`GestureSample::NEUTRAL`].
pub fn classify(landmarks: &[Landmark]) -> GestureSample {
    let Some(raised) = raised_fingers(landmarks) else {
        return GestureSample::NEUTRAL;
    };

    let pointer = landmarks[hand::MIDDLE_FINGER_MCP];
    if !pointer.is_finite() {
        return GestureSample::NEUTRAL;
    }

    let count = raised.iter().filter(|&&up| up).count();
    let kind = match count {
        0 => GestureKind::Fist,
        1 if raised[0] => GestureKind::Point,
        3.. => GestureKind::Open,
        _ => GestureKind::None,
    };

    GestureSample::new(kind, Vec3::new(pointer.x, pointer.y, pointer.z))
}
