// Copyright @yucwang 2026

use crate::math::bounds::Bounds3f;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;

use std::cmp::Ordering;

const MAX_LEAF_PRIMS: usize = 4;

/// Depth-first node layout: the first child of a split node sits right
/// after it, the second child at `second`.
#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf { bounds: Bounds3f, first: usize, count: usize },
    Split { bounds: Bounds3f, second: usize, axis: usize },
}

impl Node {
    fn bounds(&self) -> &Bounds3f {
        match self {
            Node::Leaf { bounds, .. } | Node::Split { bounds, .. } => bounds,
        }
    }
}

/// Bounding volume hierarchy over scene primitives, split at the median
/// centroid along the widest centroid axis.
pub struct BVH {
    nodes: Vec<Node>,
    order: Vec<usize>,
}

impl BVH {
    pub fn build(prim_bounds: &[Bounds3f]) -> Self {
        let mut prims: Vec<(usize, Bounds3f)> = prim_bounds.iter().copied().enumerate().collect();
        let mut nodes = Vec::with_capacity(2 * prims.len() / MAX_LEAF_PRIMS + 1);
        if !prims.is_empty() {
            let len = prims.len();
            split(&mut prims, 0, len, &mut nodes);
        }
        Self { nodes, order: prims.into_iter().map(|(i, _)| i).collect() }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Closest primitive along `ray`. `hit_fn` receives a primitive index
    /// and a copy of the ray clipped to the best hit found so far, and
    /// returns the hit with its distance.
    pub fn closest_hit<F, T>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, T)>
    where
        F: FnMut(usize, &Ray3f) -> Option<(T, Float)>,
    {
        let mut ray = *ray;
        let mut best = None;
        let mut pending = Vec::with_capacity(64);
        if !self.nodes.is_empty() {
            pending.push(0);
        }

        while let Some(at) = pending.pop() {
            let node = &self.nodes[at];
            if !node.bounds().hit_by(&ray) {
                continue;
            }
            match *node {
                Node::Leaf { first, count, .. } => {
                    for &prim in &self.order[first..first + count] {
                        if let Some((hit, t)) = hit_fn(prim, &ray) {
                            if ray.update(t) {
                                best = Some((prim, hit));
                            }
                        }
                    }
                }
                Node::Split { second, axis, .. } => {
                    // Near child last so it is popped first.
                    if ray.dir()[axis] < 0.0 {
                        pending.push(at + 1);
                        pending.push(second);
                    } else {
                        pending.push(second);
                        pending.push(at + 1);
                    }
                }
            }
        }

        best
    }
}

fn split(prims: &mut [(usize, Bounds3f)], lo: usize, hi: usize, nodes: &mut Vec<Node>) -> usize {
    let range = &mut prims[lo..hi];
    let mut bounds = Bounds3f::empty();
    let mut centroids = Bounds3f::empty();
    for (_, b) in range.iter() {
        bounds.union(b);
        centroids.grow(&b.centroid());
    }

    let at = nodes.len();
    let axis = centroids.longest_axis();
    if range.len() <= MAX_LEAF_PRIMS || centroids.extent()[axis] <= 0.0 {
        nodes.push(Node::Leaf { bounds, first: lo, count: hi - lo });
        return at;
    }

    let half = range.len() / 2;
    range.select_nth_unstable_by(half, |(_, a), (_, b)| {
        a.centroid()[axis].partial_cmp(&b.centroid()[axis]).unwrap_or(Ordering::Equal)
    });

    nodes.push(Node::Split { bounds, second: 0, axis });
    split(prims, lo, lo + half, nodes);
    let second_at = split(prims, lo + half, hi, nodes);
    if let Node::Split { second, .. } = &mut nodes[at] {
        *second = second_at;
    }
    at
}
