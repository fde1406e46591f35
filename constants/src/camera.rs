use bevy::math::Vec3;

use crate::scene::SCATTER_CENTER;

/// Point the camera relaxes back to when no gesture steers it.
pub const DEFAULT_TARGET: Vec3 = SCATTER_CENTER;

/// Resting orbit distance.
pub const DEFAULT_DISTANCE: f32 = 22.0;

/// Orbit elevation (radians), matching an eye at (0, 6, 25) looking at the target.
pub const DEFAULT_ELEVATION: f32 = 0.04;

pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 45.0;

/// Idle auto-rotation in the tree formation (radians per second).
pub const AUTO_ROTATE_SPEED_TREE: f32 = 0.084;

/// Idle auto-rotation while scattered (radians per second).
pub const AUTO_ROTATE_SPEED_SCATTERED: f32 = 0.042;

/// Full azimuth range covered by the pointer's x axis.
pub const POINTER_ROTATION_RANGE: f32 = std::f32::consts::TAU;

/// Pointer depth range mapped onto the zoom range.
pub const POINTER_DEPTH_MIN: f32 = -0.2;
pub const POINTER_DEPTH_MAX: f32 = 0.2;

/// Zoom range the pointer depth maps onto.
pub const ZOOM_DISTANCE_NEAR: f32 = 10.0;
pub const ZOOM_DISTANCE_FAR: f32 = 35.0;

pub const AZIMUTH_SMOOTHING: f32 = 0.05;
pub const DISTANCE_SMOOTHING: f32 = 0.05;
pub const FOCUS_TARGET_SMOOTHING: f32 = 0.08;
pub const IDLE_TARGET_SMOOTHING: f32 = 0.02;

/// Vertical field of view (degrees).
pub const FIELD_OF_VIEW_DEGREES: f32 = 40.0;
