// Copyright @yucwang 2023

use crate::core::material::Material;
use crate::math::constants::{ Float, Vector3f };

/// Geometric part of a ray/shape intersection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    t: Float,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f, new_geo_normal: Vector3f, new_t: Float) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, t: new_t }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn with_material<'a>(&self, material: &'a Material, material_id: usize) -> SurfaceHit<'a> {
        SurfaceHit {
            p: self.p,
            normal: self.geo_normal,
            t: self.t,
            material,
            material_id,
        }
    }
}

/// Nearest hit reported by an intersection oracle.
///
/// `normal` is the unit geometric normal as stored on the primitive; it is
/// not oriented against the ray. Shading code flips it as needed.
#[derive(Debug, Copy, Clone)]
pub struct SurfaceHit<'a> {
    pub p: Vector3f,
    pub normal: Vector3f,
    pub t: Float,
    pub material: &'a Material,
    pub material_id: usize,
}
