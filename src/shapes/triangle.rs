// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::math::bounds::Bounds3f;
use crate::math::constants::{ EPSILON, Float, Vector3f };
use crate::math::ray::Ray3f;

use std::option::Option;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f,
    // Zero for degenerate triangles, which are never hit.
    geo_normal: Vector3f,
}

impl Triangle {
    pub fn new(new_p0: Vector3f, new_p1: Vector3f, new_p2: Vector3f) -> Self {
        Triangle {
            p0: new_p0,
            p1: new_p1,
            p2: new_p2,
            geo_normal: unit_normal(&new_p0, &new_p1, &new_p2),
        }
    }

    pub fn bounding_box(&self) -> Bounds3f {
        Bounds3f::around(&[self.p0, self.p1, self.p2])
    }

    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        if self.is_degenerate() {
            return None;
        }
        let geo_normal = self.geo_normal;
        let n_dot_dir = geo_normal.dot(&ray.dir());

        if n_dot_dir > -EPSILON && n_dot_dir < EPSILON {
            return None;
        }

        let plane_d = geo_normal.dot(&self.p0);
        let t = (plane_d - geo_normal.dot(&ray.origin())) / n_dot_dir;
        if !ray.test_segment(t) {
            return None;
        }

        let intersection_p = ray.at(t);
        if self.is_in_triangle(&intersection_p) {
            Some(SurfaceIntersection::new(intersection_p, geo_normal, t))
        } else {
            None
        }
    }

    pub fn surface_area(&self) -> Float {
        0.5 * ((self.p1 - self.p0).cross(&(self.p2 - self.p0))).norm()
    }

    pub fn is_degenerate(&self) -> bool {
        self.geo_normal == Vector3f::zeros()
    }

    fn is_in_triangle(&self, p: &Vector3f) -> bool {
        let n0 = (self.p1 - self.p0).cross(&(p - self.p0));
        let n1 = (self.p2 - self.p1).cross(&(p - self.p1));
        let n2 = (self.p0 - self.p2).cross(&(p - self.p2));

        (n0.dot(&self.geo_normal) >= 0.0) && (n1.dot(&self.geo_normal) >= 0.0) && (n2.dot(&self.geo_normal) >= 0.0)
    }

    pub fn geometric_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn apply_transform(&mut self, scale: &Vector3f, translate: &Vector3f) {
        self.p0 = self.p0.component_mul(scale) + translate;
        self.p1 = self.p1.component_mul(scale) + translate;
        self.p2 = self.p2.component_mul(scale) + translate;
        self.geo_normal = unit_normal(&self.p0, &self.p1, &self.p2);
    }
}

fn unit_normal(p0: &Vector3f, p1: &Vector3f, p2: &Vector3f) -> Vector3f {
    let n = (p1 - p0).cross(&(p2 - p0));
    let len = n.norm();
    if len > 0.0 { n / len } else { Vector3f::zeros() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box1() {
        let p0 = Vector3f::new(1.0, 1.0, 1.0);
        let p1 = Vector3f::new(1.5, 4.0, -1.0);
        let p2 = Vector3f::new(-1.0, 2.0, 2.5);

        let triangle = Triangle::new(p0, p1, p2);
        let bounding_box = triangle.bounding_box();

        assert_eq!(bounding_box.lo, Vector3f::new(-1.0, 1.0, -1.0));
        assert_eq!(bounding_box.hi, Vector3f::new(1.5, 4.0, 2.5));
    }

    #[test]
    fn test_is_in_triangle1() {
        let triangle = Triangle::new(Vector3f::new(1.0, 1.0, 0.0),
                                     Vector3f::new(2.0, 2.0, 0.0),
                                     Vector3f::new(2.0, 1.0, 0.0));

        assert!(triangle.is_in_triangle(&Vector3f::new(1.5, 1.1, 0.0)));
        assert!(!triangle.is_in_triangle(&Vector3f::new(1.5, 2.0, 0.0)));
    }

    #[test]
    fn test_ray_intersection() {
        let triangle = Triangle::new(Vector3f::new(1.0, 1.0, 0.0),
                                     Vector3f::new(2.0, 2.0, 0.0),
                                     Vector3f::new(2.0, 1.0, 0.0));

        let ray1 = Ray3f::new(Vector3f::new(1.5, 1.1, 3.0),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            None);
        let ray2 = Ray3f::new(Vector3f::new(1.5, 1.1, 3.0),
            Vector3f::new(0.0, 0.0, 1.0),
            None,
            None);

        let hit = triangle.ray_intersection(&ray1).expect("expected a hit");
        assert!((hit.t() - 3.0).abs() < 1e-5);
        assert!((hit.p() - Vector3f::new(1.5, 1.1, 0.0)).norm() < 1e-5);
        assert!(triangle.ray_intersection(&ray2).is_none());
    }

    #[test]
    fn test_degenerate_triangle_is_never_hit() {
        let p = Vector3f::new(0.0, 0.0, 0.0);
        let triangle = Triangle::new(p, p, Vector3f::new(1.0, 0.0, 0.0));
        assert!(triangle.is_degenerate());
        let ray = Ray3f::new(Vector3f::new(0.2, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(triangle.ray_intersection(&ray).is_none());
    }
}
