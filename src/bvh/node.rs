// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

use crate::math::{Aabb, Ray};
use crate::storage::{ResolvableHit, SceneBlob};
use ordered_float::NotNan;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Either a *leaf*, owning a [`SceneBlob`] restricted to bounded shape types, or a
/// *partition*, a list of `(child, bounding_volume)` pairs. Partition nodes never
/// resolve hits themselves; they only enqueue children for the best-first traversal.
pub enum BvhNode {
    Leaf(SceneBlob),
    Partition(Vec<(Box<BvhNode>, Aabb)>),
}

struct QueueEntry<'a> {
    dist: NotNan<f32>,
    node: &'a BvhNode,
}

impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}
impl Eq for QueueEntry<'_> {}
impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.dist.cmp(&other.dist)
    }
}

impl BvhNode {
    /// Best-first traversal: a min-priority queue keyed on bounding-volume near-`t`.
    /// `best` is threaded through as both the accumulated nearest hit and the pruning
    /// threshold, so callers can seed it with e.g. an unbounded-pool hit before calling.
    pub fn query_nearest<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>) {
        let mut queue = BinaryHeap::new();
        queue.push(Reverse(QueueEntry { dist: NotNan::new(0.0).unwrap(), node: self }));

        while let Some(Reverse(entry)) = queue.pop() {
            let nearest = best.as_ref().map(|h| h.t()).unwrap_or(f32::INFINITY);
            if entry.dist.into_inner() >= nearest {
                break;
            }
            entry.node.next_hit(ray, best, &mut queue);
        }
    }

    fn next_hit<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>, queue: &mut BinaryHeap<Reverse<QueueEntry<'a>>>) {
        match self {
            BvhNode::Leaf(blob) => {
                blob.query_nearest(ray, best);
            }
            BvhNode::Partition(children) => {
                let t_max = best.as_ref().map(|h| h.t()).unwrap_or(f32::INFINITY);
                for (child, bv) in children {
                    let hit = bv.raycast_bv(ray, t_max);
                    crate::perf::record_bv_raycast(hit.is_some());
                    if let Some(t) = hit {
                        queue.push(Reverse(QueueEntry { dist: NotNan::new(t).unwrap(), node: child }));
                    }
                }
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Leaf(_) => 1,
            BvhNode::Partition(children) => children.iter().map(|(child, _)| child.leaf_count()).sum(),
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            BvhNode::Leaf(_) => 1,
            BvhNode::Partition(children) => 1 + children.iter().map(|(child, _)| child.depth()).max().unwrap_or(0),
        }
    }
}
