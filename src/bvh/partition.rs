// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Strategies for splitting a range of bounded scene objects into BVH children.
//!
//! A partitioner receives `[first, last)` (here, a mutable slice) with at least two
//! entries, may reorder it, and returns a non-empty sequence of subrange-end indices
//! whose last element equals the slice length.

use super::entry::BoundedEntry;
use crate::math::Aabb;

pub trait Partitioner: Send + Sync {
    fn partition(&self, entries: &mut [BoundedEntry]) -> Vec<usize>;
}

fn bounding_box(entries: &[BoundedEntry]) -> Aabb {
    let mut bb = Aabb::empty();
    for entry in entries {
        bb.extend_with_box(&entry.aabb());
    }
    bb
}

fn center_axis(entry: &BoundedEntry, axis: usize) -> f32 {
    let c = entry.center();
    match axis {
        0 => c.x,
        1 => c.y,
        _ => c.z,
    }
}

/// Splits at the median of object centers along the range's biggest-extent axis.
/// Always produces exactly two children.
#[derive(Default)]
pub struct MedianPartitioner;

impl Partitioner for MedianPartitioner {
    fn partition(&self, entries: &mut [BoundedEntry]) -> Vec<usize> {
        let axis = bounding_box(entries).biggest_extent_axis();
        let mid = entries.len() / 2;
        entries.select_nth_unstable_by(mid, |a, b| {
            center_axis(a, axis).partial_cmp(&center_axis(b, axis)).expect("non-NaN center")
        });
        vec![mid, entries.len()]
    }
}

/// Splits at the arithmetic mean of object centers along the biggest-extent axis,
/// recursively subdividing each half up to `order` times to produce up to `2^order`
/// roughly-equal children (fewer if a half can no longer be split).
pub struct MeanPartitioner {
    pub order: u32,
}

impl Default for MeanPartitioner {
    fn default() -> Self {
        MeanPartitioner { order: 1 }
    }
}

impl MeanPartitioner {
    pub fn new(order: u32) -> MeanPartitioner {
        MeanPartitioner { order }
    }

    fn recurse(&self, entries: &mut [BoundedEntry], remaining_order: u32, base: usize, bounds: &mut Vec<usize>) {
        if remaining_order == 0 || entries.len() <= 1 {
            bounds.push(base + entries.len());
            return;
        }
        let axis = bounding_box(entries).biggest_extent_axis();
        let mean: f32 = entries.iter().map(|e| center_axis(e, axis)).sum::<f32>() / entries.len() as f32;
        let mut split = itertools::partition(entries.iter_mut(), |e| center_axis(e, axis) < mean);
        // Every center landing on the same side (e.g. coincident objects) would
        // otherwise recurse forever; force a non-degenerate split.
        split = split.clamp(1, entries.len() - 1);
        let (left, right) = entries.split_at_mut(split);
        self.recurse(left, remaining_order - 1, base, bounds);
        self.recurse(right, remaining_order - 1, base + split, bounds);
    }
}

impl Partitioner for MeanPartitioner {
    fn partition(&self, entries: &mut [BoundedEntry]) -> Vec<usize> {
        let mut bounds = Vec::new();
        self.recurse(entries, self.order, 0, &mut bounds);
        bounds
    }
}
