use bevy::color::Color;

/// #ff69b4
pub const PINK: Color = Color::srgb(1.0, 0.412, 0.706);

/// #ffd700
pub const GOLD: Color = Color::srgb(1.0, 0.843, 0.0);

/// #ff1493
pub const PINK_GLOW: Color = Color::srgb(1.0, 0.078, 0.576);

/// #ff007f
pub const DEEP_PINK: Color = Color::srgb(1.0, 0.0, 0.498);

/// #f9d423
pub const LUXURY_GOLD: Color = Color::srgb(0.976, 0.831, 0.137);

/// Polaroid frame.
pub const PHOTO_FRAME: Color = Color::WHITE;

/// Shown on a photo panel until (or instead of) its texture.
pub const PHOTO_PLACEHOLDER: Color = Color::srgb(0.16, 0.16, 0.18);

/// Ground plane.
pub const GROUND: Color = Color::srgb(0.082, 0.082, 0.082);
