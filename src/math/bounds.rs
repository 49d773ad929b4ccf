// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};
use super::ray::Ray3f;

/// Axis-aligned box. A freshly created box is empty (`lo > hi`) and
/// absorbs the first point or box grown into it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub lo: Vector3f,
    pub hi: Vector3f,
}

impl Default for Bounds3f {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds3f {
    pub fn empty() -> Self {
        Self {
            lo: Vector3f::repeat(Float::INFINITY),
            hi: Vector3f::repeat(Float::NEG_INFINITY),
        }
    }

    pub fn around<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vector3f>,
    {
        points.into_iter().fold(Self::empty(), |mut b, p| {
            b.grow(p);
            b
        })
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|a| self.lo[a] > self.hi[a])
    }

    pub fn grow(&mut self, p: &Vector3f) {
        self.lo = self.lo.inf(p);
        self.hi = self.hi.sup(p);
    }

    pub fn union(&mut self, other: &Bounds3f) {
        self.lo = self.lo.inf(&other.lo);
        self.hi = self.hi.sup(&other.hi);
    }

    pub fn centroid(&self) -> Vector3f {
        (self.lo + self.hi) * 0.5
    }

    pub fn extent(&self) -> Vector3f {
        if self.is_empty() { Vector3f::zeros() } else { self.hi - self.lo }
    }

    /// Index of the widest axis; ties go to the later axis.
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x > e.y && e.x > e.z {
            0
        } else if e.y > e.z {
            1
        } else {
            2
        }
    }

    /// Slab test against the ray's `[min_t, max_t]` segment.
    pub fn hit_by(&self, ray: &Ray3f) -> bool {
        if self.is_empty() {
            return false;
        }
        let (o, d) = (ray.origin(), ray.dir());
        let (mut near, mut far) = (ray.min_t, ray.max_t);
        for a in 0..3 {
            if d[a] == 0.0 {
                if o[a] < self.lo[a] || o[a] > self.hi[a] {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / d[a];
            let t0 = (self.lo[a] - o[a]) * inv;
            let t1 = (self.hi[a] - o[a]) * inv;
            near = near.max(t0.min(t1));
            far = far.min(t0.max(t1));
            if near > far {
                return false;
            }
        }
        true
    }
}
