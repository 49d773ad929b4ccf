// Copyright @yucwang 2026

use crate::core::photon::Photon;
use crate::math::bounds::Bounds3f;
use crate::math::constants::{Float, Vector3f};

use std::cmp::Ordering;

/// One k-nearest-neighbour result.
#[derive(Debug, Copy, Clone)]
pub struct Neighbour<'a> {
    pub photon: &'a Photon,
    pub distance_squared: Float,
}

/// Balanced k-d tree stored implicitly: the node for the index range
/// `[lo, hi)` is the photon at `(lo + hi) / 2`, split on `axes[mid]`.
pub struct PhotonKdTree {
    photons: Vec<Photon>,
    axes: Vec<u8>,
}

impl PhotonKdTree {
    /// Build over a slot buffer; empty slots are skipped.
    pub fn build(slots: &[Option<Photon>]) -> Self {
        let mut photons: Vec<Photon> = slots.iter().filter_map(|slot| *slot).collect();
        let mut axes = vec![0u8; photons.len()];
        let len = photons.len();
        build_range(&mut photons, &mut axes, 0, len);

        Self { photons, axes }
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    /// Up to `k` photons within `max_radius` of `point`, nearest first.
    pub fn k_nearest(&self, point: &Vector3f, k: usize, max_radius: Float) -> Vec<Neighbour<'_>> {
        let mut candidates: Vec<(Float, usize)> = Vec::with_capacity(k + 1);
        if k == 0 || self.photons.is_empty() || !(max_radius > 0.0) {
            return Vec::new();
        }

        let mut radius_squared = max_radius * max_radius;
        let mut stack: Vec<(usize, usize)> = vec![(0, self.photons.len())];
        while let Some((lo, hi)) = stack.pop() {
            if lo >= hi {
                continue;
            }
            let mid = lo + (hi - lo) / 2;
            let photon = &self.photons[mid];
            let axis = self.axes[mid] as usize;

            let d2 = (photon.position - point).norm_squared();
            if d2 <= radius_squared {
                insert_candidate(&mut candidates, k, d2, mid);
                if candidates.len() == k {
                    radius_squared = candidates[k - 1].0;
                }
            }

            let diff = point[axis] - photon.position[axis];
            let (near, far) = if diff < 0.0 {
                ((lo, mid), (mid + 1, hi))
            } else {
                ((mid + 1, hi), (lo, mid))
            };

            // Far side first on the stack so the near side is searched first.
            if diff * diff <= radius_squared {
                stack.push(far);
            }
            stack.push(near);
        }

        candidates
            .into_iter()
            .map(|(distance_squared, idx)| Neighbour { photon: &self.photons[idx], distance_squared })
            .collect()
    }

    /// Closest photon within `max_radius`, if any.
    pub fn nearest(&self, point: &Vector3f, max_radius: Float) -> Option<Neighbour<'_>> {
        self.k_nearest(point, 1, max_radius).into_iter().next()
    }
}

fn insert_candidate(candidates: &mut Vec<(Float, usize)>, k: usize, d2: Float, idx: usize) {
    let pos = candidates
        .iter()
        .position(|(c, _)| d2 < *c)
        .unwrap_or(candidates.len());
    if pos >= k {
        return;
    }
    candidates.insert(pos, (d2, idx));
    candidates.truncate(k);
}

fn build_range(photons: &mut [Photon], axes: &mut [u8], lo: usize, hi: usize) {
    if hi <= lo {
        return;
    }
    if hi - lo == 1 {
        axes[lo] = 0;
        return;
    }

    let axis = Bounds3f::around(photons[lo..hi].iter().map(|p| &p.position)).longest_axis();

    let mid = lo + (hi - lo) / 2;
    photons[lo..hi].select_nth_unstable_by(mid - lo, |a, b| {
        a.position[axis].partial_cmp(&b.position[axis]).unwrap_or(Ordering::Equal)
    });
    axes[mid] = axis as u8;

    build_range(photons, axes, lo, mid);
    build_range(photons, axes, mid + 1, hi);
}
