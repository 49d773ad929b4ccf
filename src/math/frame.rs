// Copyright @yucwang 2023

use crate::math::constants::{ Vector3f };

/// Orthonormal basis with `z` along a surface normal.
#[derive(Debug, Copy, Clone)]
pub struct Frame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            x: Vector3f::new(1.0, 0.0, 0.0),
            y: Vector3f::new(0.0, 1.0, 0.0),
            z: Vector3f::new(0.0, 0.0, 1.0)
        }
    }
}

impl Frame {
    pub fn new(new_x: Vector3f, new_y: Vector3f, new_z: Vector3f) -> Frame {
        Frame {
            x: new_x,
            y: new_y,
            z: new_z
        }
    }

    pub fn from_normal(n: &Vector3f) -> Frame {
        let up = if n.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let tangent = n.cross(&up).normalize();
        let bitangent = n.cross(&tangent).normalize();
        Frame::new(tangent, bitangent, *n)
    }

    pub fn from_local(&self, v: Vector3f) -> Vector3f {
        v.x * self.x + v.y * self.y + v.z * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_orthonormal() {
        let n = Vector3f::new(0.3, -0.8, 0.52).normalize();
        let frame = Frame::from_normal(&n);
        assert!(frame.x.dot(&n).abs() < 1e-5);
        assert!(frame.y.dot(&n).abs() < 1e-5);
        assert!(frame.x.dot(&frame.y).abs() < 1e-5);

        let v = Vector3f::new(0.1, 0.2, 0.9);
        assert!((frame.from_local(v).norm() - v.norm()).abs() < 1e-5);
        assert!((frame.from_local(Vector3f::new(0.0, 0.0, 1.0)) - n).norm() < 1e-6);
    }
}
