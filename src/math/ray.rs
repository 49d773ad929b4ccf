// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f, RAY_OFFSET};

#[derive(Debug, Copy, Clone)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float
}

impl Ray3f {
    /// Directions are normalised on construction; a zero direction is kept
    /// as-is and will simply miss everything.
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        let len_sq = d.norm_squared();
        let dir = if len_sq > 0.0 { d / len_sq.sqrt() } else { d };
        Self { origin: o, dir,
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(std::f32::MAX)}
    }

    /// Secondary ray leaving a surface point. The origin is pushed off the
    /// surface on the side the new direction points to.
    pub fn spawn(p: Vector3f, geo_normal: Vector3f, d: Vector3f) -> Self {
        let offset = if geo_normal.dot(&d) >= 0.0 { geo_normal } else { -geo_normal };
        Self::new(p + offset * RAY_OFFSET, d, Some(0.0), None)
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn update(&mut self, t: Float) -> bool {
        if t < self.min_t || t > self.max_t {
            false
        } else {
            self.max_t = t;
            true
        }
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::Vector3f;
    use super::{Ray3f};

    #[test]
    fn test_ray3f() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(1.0, 0.0, 1.0);
        let mut ray = Ray3f::new(o, d, None, None);
        assert_eq!(o, ray.origin());
        assert!((ray.dir().norm() - 1.0).abs() < 1e-6);

        let v1 = ray.at(2.0);
        assert!((v1[0] - std::f32::consts::SQRT_2).abs() < 1e-5);
        assert!((v1[1] - 0.0).abs() < 1e-6);
        assert!((v1[2] - std::f32::consts::SQRT_2).abs() < 1e-5);

        let status1 = ray.update(100.0);
        let status2 = ray.update(105.0);
        assert_eq!(status1, true);
        assert_eq!(status2, false);
        assert!(ray.test_segment(50.0));
        assert!(!ray.test_segment(101.0));
    }

    #[test]
    fn test_spawn_offsets_towards_direction() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let up = Ray3f::spawn(Vector3f::zeros(), n, Vector3f::new(0.0, 1.0, 0.0));
        let down = Ray3f::spawn(Vector3f::zeros(), n, Vector3f::new(0.0, -1.0, 0.0));
        assert!(up.origin().y > 0.0);
        assert!(down.origin().y < 0.0);
    }
}
