use glam::{Mat4, Vec3};
use serde::Serialize;
use solar_common::OrbitDirection;

/// Highest pitch the camera can reach before the view degenerates.
const MAX_PITCH_DEGREES: f32 = 89.0;

/// Camera that stays on a sphere around a target and always looks at it.
///
/// Yaw and pitch are in degrees. Yaw 0 and pitch 0 put the camera on the +Z
/// axis of the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, 30.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    /// Place the camera at `position`, facing `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let radius = offset.length();
        let (yaw, pitch) = if radius > f32::EPSILON {
            (
                offset.x.atan2(offset.z).to_degrees(),
                (offset.y / radius).clamp(-1.0, 1.0).asin().to_degrees(),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            position,
            target,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES),
            radius,
            zoom: 45.0,
            aspect: 1080.0 / 720.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Move the camera `angle` degrees around the target at distance `radius`.
    pub fn orbit(&mut self, direction: OrbitDirection, radius: f32, angle: f32) {
        match direction {
            OrbitDirection::Up => self.pitch += angle,
            OrbitDirection::Down => self.pitch -= angle,
            OrbitDirection::Right => self.yaw += angle,
            OrbitDirection::Left => self.yaw -= angle,
        }
        self.pitch = self.pitch.clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
        self.yaw = self.yaw.rem_euclid(360.0);
        self.radius = radius;
        self.position = self.target + self.offset_direction() * radius;
    }

    /// Unit vector from the target towards the camera.
    pub fn offset_direction(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            pitch.cos() * yaw.sin(),
            pitch.sin(),
            pitch.cos() * yaw.cos(),
        )
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn default_camera_sits_on_z_axis() {
        let cam = OrbitCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 30.0));
        assert_eq!(cam.radius, 30.0);
        assert_eq!(cam.yaw, 0.0);
        assert_eq!(cam.pitch, 0.0);
        assert!(approx(cam.forward(), Vec3::NEG_Z));
    }

    #[test]
    fn one_step_up_moves_pitch_by_one_degree() {
        let mut cam = OrbitCamera::default();
        cam.orbit(OrbitDirection::Up, 30.0, 1.0);
        assert_eq!(cam.pitch, 1.0);
        assert_eq!(cam.yaw, 0.0);
        assert!(cam.position.y > 0.0);
        assert!((cam.position.length() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn right_moves_towards_positive_x() {
        let mut cam = OrbitCamera::default();
        cam.orbit(OrbitDirection::Right, 30.0, 90.0);
        assert!(approx(cam.position, Vec3::new(30.0, 0.0, 0.0)));
        cam.orbit(OrbitDirection::Left, 30.0, 90.0);
        assert!(approx(cam.position, Vec3::new(0.0, 0.0, 30.0)));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = OrbitCamera::default();
        for _ in 0..200 {
            cam.orbit(OrbitDirection::Down, 30.0, 1.0);
        }
        assert_eq!(cam.pitch, -MAX_PITCH_DEGREES);
        assert!(!cam.view_matrix().col(0).x.is_nan());
    }

    #[test]
    fn view_projection_is_finite() {
        let cam = OrbitCamera::default();
        let vp = cam.projection_matrix() * cam.view_matrix();
        assert!(vp.is_finite());
    }
}
