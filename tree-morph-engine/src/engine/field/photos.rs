use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::field::elements::{PhotoId, PhotoPanel};
use crate::engine::field::interpolation::MotionTuning;
use crate::engine::geometry::sampler::{RibbonShape, ribbon_point, ribbon_point_at};
use crate::engine::morph::state_machine::MorphState;

/// How scatter targets are assigned along the ribbon as photos arrive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoLayout {
    /// Every upload re-spaces the whole ribbon over the new total.
    #[default]
    Reflow,
    /// Each panel keeps the slot it was created in, spaced over a fixed capacity.
    StableSlots,
}

/// A photo to add at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoEntry {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryTuning {
    pub layout: PhotoLayout,
    /// Slot count of the ribbon under [`PhotoLayout::StableSlots`].
    pub stable_capacity: usize,
    pub initial_photos: Vec<PhotoEntry>,
}

impl Default for GalleryTuning {
    fn default() -> Self {
        Self {
            layout: PhotoLayout::Reflow,
            stable_capacity: 24,
            initial_photos: (1..=5)
                .map(|n| PhotoEntry {
                    id: format!("memory-{n}"),
                    url: format!("photos/memory_{n}.jpg"),
                })
                .collect(),
        }
    }
}

impl GalleryTuning {
    /// Scatter target of the panel in `slot` when `total` panels exist.
    pub fn scatter_position(&self, slot: usize, total: usize, ribbon: &RibbonShape) -> Vec3 {
        match self.layout {
            PhotoLayout::Reflow => ribbon_point(slot, total, ribbon),
            PhotoLayout::StableSlots => {
                let capacity = self.stable_capacity.max(1);
                // Slots past the capacity wrap onto later laps, each shifted
                // between the earlier laps' slots so no two panels coincide.
                let lap = (slot / capacity) as u32;
                let offset = lap.reverse_bits() as f32 / 2f32.powi(32);
                let t = ((slot % capacity) as f32 + offset) / capacity as f32;
                ribbon_point_at(t, ribbon)
            }
        }
    }
}

/// Emitted pose of a panel: jitter and the focus blend on top of the stored
/// current position, then the facing rule for the active formation.
///
/// Scattered panels face the eye. Assembled panels face outward from the
/// trunk and stay upright.
pub fn panel_transform(
    panel: &PhotoPanel,
    state: MorphState,
    eye: Vec3,
    jitter: Vec3,
    motion: &MotionTuning,
) -> Transform {
    let base = panel.path().current_position() + jitter;
    let weight = panel.focus_weight().clamp(0.0, 1.0);
    let toward_eye = (eye - base).normalize_or_zero();
    let position = base + toward_eye * motion.focus_pull_distance * weight;
    let scale = 1.0 + (motion.focus_scale - 1.0) * weight;

    let facing = match state {
        MorphState::Scattered => (eye - position).normalize_or(Vec3::Z),
        MorphState::TreeShape => Vec3::new(position.x, 0.0, position.z).normalize_or(Vec3::Z),
    };

    // Panel meshes face +Z, and looking_to points -Z along its argument.
    Transform::from_translation(position)
        .looking_to(-facing, Vec3::Y)
        .with_scale(Vec3::splat(scale))
}

/// Nearest panel to `eye` by straight-line distance.
pub fn nearest_panel<'a>(
    panels: impl IntoIterator<Item = &'a PhotoPanel>,
    eye: Vec3,
) -> Option<(&'a PhotoId, Vec3)> {
    panels
        .into_iter()
        .map(|panel| (&panel.id, panel.path().current_position()))
        .filter(|(_, position)| position.is_finite())
        .min_by(|(_, a), (_, b)| a.distance_squared(eye).total_cmp(&b.distance_squared(eye)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_slots_ignore_the_total() {
        let ribbon = RibbonShape::default();
        let gallery = GalleryTuning {
            layout: PhotoLayout::StableSlots,
            ..default()
        };
        assert_eq!(
            gallery.scatter_position(2, 5, &ribbon),
            gallery.scatter_position(2, 6, &ribbon)
        );
    }

    #[test]
    fn reflow_depends_on_the_total() {
        let ribbon = RibbonShape::default();
        let gallery = GalleryTuning::default();
        assert_ne!(
            gallery.scatter_position(2, 5, &ribbon),
            gallery.scatter_position(2, 6, &ribbon)
        );
    }

    #[test]
    fn slots_past_capacity_do_not_overlap_earlier_panels() {
        let ribbon = RibbonShape::default();
        let gallery = GalleryTuning {
            layout: PhotoLayout::StableSlots,
            stable_capacity: 4,
            initial_photos: Vec::new(),
        };
        let positions: Vec<Vec3> = (0..12)
            .map(|slot| gallery.scatter_position(slot, 12, &ribbon))
            .collect();

        for (i, a) in positions.iter().enumerate() {
            assert!(a.is_finite());
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) > 1e-3, "{a} overlaps {b}");
            }
        }
        assert_eq!(positions[1], ribbon_point(1, 4, &ribbon));
    }

    #[test]
    fn zero_capacity_is_treated_as_one_slot() {
        let ribbon = RibbonShape::default();
        let gallery = GalleryTuning {
            layout: PhotoLayout::StableSlots,
            stable_capacity: 0,
            initial_photos: Vec::new(),
        };
        assert!(gallery.scatter_position(3, 4, &ribbon).is_finite());
    }

    #[test]
    fn default_gallery_ships_five_photos() {
        assert_eq!(GalleryTuning::default().initial_photos.len(), 5);
    }
}
