//! Runtime tuning table.
//!
//! One JSON asset overrides any subset of the compile-time defaults in the
//! `constants` crate: counts, formation shapes, motion, camera, gallery and
//! tracking.

/// `MorphTuning` asset and its sections.
pub mod morph_tuning;

pub use morph_tuning::{ElementCounts, FormationTuning, MorphTuning};
