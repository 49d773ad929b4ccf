// Copyright @yucwang 2023

use super::triangle::Triangle;

use crate::io::obj_utils;
use crate::io::obj_utils::ObjLoadError;
use crate::math::bounds::Bounds3f;
use crate::math::constants::{ Float, Vector3f };

use std::path::Path;
use std::vec::Vec;

use wavefront_obj::obj;

/// World-space triangle soup loaded from a Wavefront OBJ file.
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    total_area: Float,
}

impl TriangleMesh {
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, ObjLoadError> {
        let obj_set = obj_utils::load_obj_from_file(path)?;
        Ok(Self::from_obj_set(&obj_set))
    }

    pub fn from_obj_str(input: &str) -> Result<Self, ObjLoadError> {
        let obj_set = obj_utils::load_obj_from_str(input)?;
        Ok(Self::from_obj_set(&obj_set))
    }

    fn from_obj_set(obj_set: &obj::ObjSet) -> Self {
        let mut triangles = Vec::new();
        let mut skipped = 0usize;

        for object in &obj_set.objects {
            let vertex = |i: usize| {
                object.vertices.get(i).map(|v| Vector3f::new(v.x as Float, v.y as Float, v.z as Float))
            };
            for geom in &object.geometry {
                for shape in &geom.shapes {
                    if let obj::Primitive::Triangle(a, b, c) = shape.primitive {
                        match (vertex(a.0), vertex(b.0), vertex(c.0)) {
                            (Some(p0), Some(p1), Some(p2)) => {
                                let tri = Triangle::new(p0, p1, p2);
                                if tri.is_degenerate() {
                                    skipped += 1;
                                } else {
                                    triangles.push(tri);
                                }
                            }
                            _ => skipped += 1,
                        }
                    }
                }
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} degenerate or malformed OBJ faces.", skipped);
        }

        let total_area = triangles.iter().map(|t| t.surface_area()).sum();
        Self { triangles, total_area }
    }

    pub fn apply_transform(&mut self, scale: &Vector3f, translate: &Vector3f) {
        for tri in &mut self.triangles {
            tri.apply_transform(scale, translate);
        }
        self.total_area = self.triangles.iter().map(|t| t.surface_area()).sum();
    }

    pub fn bounding_box(&self) -> Bounds3f {
        self.triangles.iter().fold(Bounds3f::empty(), |mut b, t| {
            b.union(&t.bounding_box());
            b
        })
    }

    pub fn surface_area(&self) -> Float {
        self.total_area
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
v -1.0 0.0 -1.0
v 1.0 0.0 -1.0
v 1.0 0.0 1.0
v -1.0 0.0 1.0
f 1 2 3 4
";

    #[test]
    fn test_quad_is_triangulated() {
        let mesh = TriangleMesh::from_obj_str(QUAD).expect("failed to parse quad");
        assert_eq!(mesh.len(), 2);
        assert!((mesh.surface_area() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_scales_area() {
        let mut mesh = TriangleMesh::from_obj_str(QUAD).expect("failed to parse quad");
        mesh.apply_transform(&Vector3f::new(2.0, 1.0, 2.0), &Vector3f::new(0.0, 3.0, 0.0));
        assert!((mesh.surface_area() - 16.0).abs() < 1e-4);
        let bounds = mesh.bounding_box();
        assert!((bounds.lo.y - 3.0).abs() < 1e-6);
        assert!((bounds.hi.x - 2.0).abs() < 1e-6);
    }
}
