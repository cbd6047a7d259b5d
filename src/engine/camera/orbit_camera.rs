use crate::constants::render_settings::CAMERA_FRAME_FACTOR;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

/// Orbit camera state. Left click stays free for point selection; right drag
/// orbits, middle drag pans the focus point, the wheel dollies.
#[derive(Resource)]
pub struct OrbitCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 10.0,
            yaw: 0.6,
            pitch: -0.45,
            min_distance: 0.1,
            max_distance: 500.0,
        }
    }
}

impl OrbitCamera {
    /// Frame the camera on freshly computed model bounds.
    pub fn frame_bounds(&mut self, centre: Vec3, size: Vec3) {
        self.focus_point = centre;
        self.max_distance = (size.length() * 10.0).max(self.max_distance);
        self.distance = (size.length() * CAMERA_FRAME_FACTOR)
            .clamp(self.min_distance, self.max_distance);
    }

    pub fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn eye_position(&self) -> Vec3 {
        self.focus_point + self.view_rotation() * Vec3::Z * self.distance
    }
}

/// Ray from the camera through a viewport position, for surface picking.
pub fn cursor_ray(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    cursor_pos: Vec2,
) -> Option<Ray3d> {
    camera.viewport_to_world(camera_transform, cursor_pos).ok()
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Right drag orbits around the focus point
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        orbit.yaw -= mouse_delta.x * yaw_sens;
        orbit.pitch -= mouse_delta.y * pitch_sens;
        orbit.pitch = orbit.pitch.clamp(-1.55, 1.55);
    }

    // Middle drag pans the focus point in the view plane
    if mouse_button.pressed(MouseButton::Middle) && mouse_delta != Vec2::ZERO {
        let pan_speed = orbit.distance * 0.0015;
        let rot = orbit.view_rotation();
        let right = rot * Vec3::X;
        let up = rot * Vec3::Y;
        orbit.focus_point += (-right * mouse_delta.x + up * mouse_delta.y) * pan_speed;
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let dolly = 1.0 - scroll_accum * 0.1;
        orbit.distance = (orbit.distance * dolly).clamp(orbit.min_distance, orbit.max_distance);
    }

    // Smoothed camera positioning
    let target_rot = orbit.view_rotation();
    let target_pos = orbit.eye_position();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_sits_behind_focus_along_view_axis() {
        let orbit = OrbitCamera {
            focus_point: Vec3::new(1.0, 2.0, 3.0),
            distance: 5.0,
            yaw: 0.0,
            pitch: 0.0,
            ..Default::default()
        };
        let eye = orbit.eye_position();
        assert!((eye - Vec3::new(1.0, 2.0, 8.0)).length() < 1e-5);
    }

    #[test]
    fn frame_bounds_scales_distance_with_model_size() {
        let mut orbit = OrbitCamera::default();
        let size = Vec3::splat(2.0);
        orbit.frame_bounds(Vec3::ZERO, size);
        assert_eq!(orbit.focus_point, Vec3::ZERO);
        assert!((orbit.distance - size.length() * CAMERA_FRAME_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn frame_bounds_respects_minimum_distance() {
        let mut orbit = OrbitCamera::default();
        orbit.frame_bounds(Vec3::ZERO, Vec3::ZERO);
        assert_eq!(orbit.distance, orbit.min_distance);
    }
}
