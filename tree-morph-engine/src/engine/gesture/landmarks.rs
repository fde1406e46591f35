use serde::{Deserialize, Serialize};

/// Landmark indices of the MediaPipe hand model.
pub mod hand {
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;

    /// Landmarks in one complete hand.
    pub const LANDMARK_COUNT: usize = 21;
}

/// One normalised hand landmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// 0..1 across the image, left to right.
    pub x: f32,
    /// 0..1 down the image; smaller is higher.
    pub y: f32,
    /// Depth relative to the wrist.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One hand as reported by a landmark producer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandJson {
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub score: Option<f32>,
}

/// One detection frame: zero or more hands, or a producer-side error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub hands: Vec<HandJson>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DetectionResult {
    /// Landmarks of the first hand scored at least `min_confidence`. Hands
    /// without a score count as confident. Only one hand steers.
    pub fn confident_hand(&self, min_confidence: f32) -> Option<&[Landmark]> {
        self.hands
            .iter()
            .find(|hand| hand.score.is_none_or(|score| score >= min_confidence))
            .map(|hand| hand.landmarks.as_slice())
    }
}
