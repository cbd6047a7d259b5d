use bevy::prelude::*;

/// Marker radius as a fraction of the camera-to-point distance.
pub const MARKER_RADIUS_FACTOR: f32 = 0.02;
/// Lower bound so markers on distant geometry stay visible.
pub const MARKER_MIN_RADIUS: f32 = 0.02;

pub const MEASURE_MARKER_COLOUR: Color = Color::srgb(0.86, 0.10, 0.10);
pub const ORIGIN_MARKER_COLOUR: Color = Color::srgb(0.16, 0.36, 0.95);

/// Initial orbit distance as a multiple of the model's bounding diagonal.
pub const CAMERA_FRAME_FACTOR: f32 = 1.6;

pub const DISTANCE_UNIT: &str = "meters";
