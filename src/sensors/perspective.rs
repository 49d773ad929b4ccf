// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Pinhole camera described by a look-at basis and a vertical field of view.
pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();
        let aspect = if height > 0 { width as Float / height as Float } else { 1.0 };

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, u: &Vector2f) -> Ray3f {
        let px = (2.0 * u.x - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * u.y) * self.tan_half_fov_y;

        let dir = self.right * px + self.up * py + self.forward;
        Ray3f::new(self.origin, dir, Some(0.0), None)
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera [origin={:?}, forward={:?}, {}x{}, tan_half_fov_y={}]",
                self.origin.as_slice(), self.forward.as_slice(),
                self.width, self.height, self.tan_half_fov_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_camera_center_ray() {
        let origin = Vector3f::new(0.0, 0.0, 0.0);
        let target = Vector3f::new(0.0, 0.0, -1.0);
        let up = Vector3f::new(0.0, 1.0, 0.0);
        let fov_y = std::f32::consts::FRAC_PI_2;
        let cam = PerspectiveCamera::new(origin, target, up, fov_y, 4, 4);

        let ray = cam.sample_ray(&Vector2f::new(0.5, 0.5));
        let dir = ray.dir();

        assert!((dir.x - 0.0).abs() < 1e-6);
        assert!((dir.y - 0.0).abs() < 1e-6);
        assert!((dir.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_camera_corners() {
        let cam = PerspectiveCamera::new(Vector3f::zeros(),
                                         Vector3f::new(0.0, 0.0, -1.0),
                                         Vector3f::new(0.0, 1.0, 0.0),
                                         std::f32::consts::FRAC_PI_2, 8, 4);
        // Top-left of the film looks up and to the left.
        let top_left = cam.sample_ray(&Vector2f::new(0.0, 0.0)).dir();
        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        // 90 degree vertical fov: the top edge is 45 degrees up.
        let top = cam.sample_ray(&Vector2f::new(0.5, 0.0)).dir();
        assert!((top.y - top.z.abs()).abs() < 1e-5);
    }
}
