// Copyright @yucwang 2026

use super::triangle::Triangle;
use crate::math::constants::{Float, Vector3f};

/// Parallelogram spanned by two edge vectors around a centre point.
#[derive(Debug, Copy, Clone)]
pub struct Rectangle {
    center: Vector3f,
    edge_u: Vector3f,
    edge_v: Vector3f,
}

impl Rectangle {
    pub fn new(center: Vector3f, edge_u: Vector3f, edge_v: Vector3f) -> Self {
        Self { center, edge_u, edge_v }
    }

    /// Axis-aligned square of side `size` facing +y.
    pub fn horizontal(center: Vector3f, size: Float) -> Self {
        Self::new(center, Vector3f::new(size, 0.0, 0.0), Vector3f::new(0.0, 0.0, -size))
    }

    pub fn corners(&self) -> [Vector3f; 4] {
        let hu = self.edge_u * 0.5;
        let hv = self.edge_v * 0.5;
        [
            self.center - hu - hv,
            self.center + hu - hv,
            self.center + hu + hv,
            self.center - hu + hv,
        ]
    }

    pub fn normal(&self) -> Vector3f {
        let n = self.edge_u.cross(&self.edge_v);
        let len = n.norm();
        if len > 0.0 { n / len } else { n }
    }

    pub fn surface_area(&self) -> Float {
        self.edge_u.cross(&self.edge_v).norm()
    }

    pub fn triangles(&self) -> [Triangle; 2] {
        let [c0, c1, c2, c3] = self.corners();
        [Triangle::new(c0, c1, c2), Triangle::new(c0, c2, c3)]
    }
}
