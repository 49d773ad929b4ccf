// Copyright @yucwang 2026

use crate::core::kd_tree::{Neighbour, PhotonKdTree};
use crate::core::photon::{Photon, PhotonBuffer};
use crate::math::constants::{Float, Vector3f};

/// Frozen photon index with its gather parameters fixed at build time.
/// Shared read-only between all gather tasks.
pub struct PhotonMap {
    tree: PhotonKdTree,
    k: usize,
    max_radius: Float,
}

impl PhotonMap {
    pub fn build(buffer: &PhotonBuffer, k: usize, max_radius: Float) -> Self {
        let tree = PhotonKdTree::build(buffer.slots());
        log::info!("Photon map built: {} photons, k = {}, max radius = {}.", tree.len(), k, max_radius);
        Self { tree, k, max_radius }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn photons(&self) -> &[Photon] {
        self.tree.photons()
    }

    pub fn query(&self, point: &Vector3f) -> Vec<Neighbour<'_>> {
        self.tree.k_nearest(point, self.k, self.max_radius)
    }

    pub fn nearest(&self, point: &Vector3f, max_radius: Float) -> Option<Neighbour<'_>> {
        self.tree.nearest(point, max_radius)
    }
}
