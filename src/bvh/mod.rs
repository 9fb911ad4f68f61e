// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The bounding-volume hierarchy: a static tree built once over all bounded scene
//! objects, partitioned by a pluggable strategy, traversed best-first.
//!
//! Picks the "post-refactor" shape where the source's two BVH generations disagree
//! (`max_depth = 16`, `max_objects_per_node = 1`, priority-queue traversal) — see
//! `DESIGN.md`'s Open Question decisions.

mod entry;
mod node;
mod partition;

pub use entry::BoundedEntry;
pub use node::BvhNode;
pub use partition::{MeanPartitioner, MedianPartitioner, Partitioner};

use crate::math::Aabb;
use crate::storage::SceneBlob;

pub const DEFAULT_MAX_DEPTH: u32 = 16;
pub const DEFAULT_MAX_OBJECTS_PER_NODE: usize = 1;

/// Builds a BVH over `entries`. Partitioning stops — and a leaf is produced — once a
/// range holds `max_objects_per_node` or fewer objects, or `max_depth` is reached.
pub fn build(entries: Vec<BoundedEntry>, partitioner: &dyn Partitioner, max_depth: u32, max_objects_per_node: usize) -> BvhNode {
    build_range(entries, partitioner, max_depth, max_objects_per_node)
}

fn build_range(mut entries: Vec<BoundedEntry>, partitioner: &dyn Partitioner, depth_remaining: u32, max_objects_per_node: usize) -> BvhNode {
    if entries.len() <= max_objects_per_node || depth_remaining == 0 {
        return BvhNode::Leaf(into_blob(entries));
    }

    let bounds = partitioner.partition(&mut entries);

    let mut pieces = Vec::with_capacity(bounds.len());
    let mut remaining = entries;
    let mut start = 0;
    for end in &bounds {
        let piece_len = end - start;
        let rest = remaining.split_off(piece_len);
        pieces.push(std::mem::replace(&mut remaining, rest));
        start = *end;
    }

    let mut children = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if piece.is_empty() {
            continue;
        }
        let bv = piece.iter().fold(Aabb::empty(), |mut acc, e| {
            acc.extend_with_box(&e.aabb());
            acc
        });
        let child = build_range(piece, partitioner, depth_remaining - 1, max_objects_per_node);
        children.push((Box::new(child), bv));
    }
    BvhNode::Partition(children)
}

fn into_blob(entries: Vec<BoundedEntry>) -> SceneBlob {
    let mut blob = SceneBlob::new();
    for entry in entries {
        match entry {
            BoundedEntry::Sphere(o) => blob.add_sphere(o),
            BoundedEntry::AaBox(o) => blob.add_aabox(o),
            BoundedEntry::Triangle(o) => blob.add_triangle(o),
            BoundedEntry::MeshFace(o) => blob.add_mesh_face(o),
            BoundedEntry::AnyUnique(s) => blob.add_any_unique(s),
            BoundedEntry::AnyShared(s) => blob.add_any_shared(s),
        }
    }
    blob
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::SurfaceMaterial;
    use crate::math::{Normal3, Ray, Rgb};
    use crate::sceneobject::SceneObject;
    use crate::shape::Sphere;
    use cgmath::{point3, vec3};
    use std::sync::Arc;

    fn material() -> Arc<SurfaceMaterial> {
        Arc::new(SurfaceMaterial {
            surface_color: Rgb::new(1.0, 1.0, 1.0),
            emission_color: Rgb::ZERO,
            transparency: 0.0,
            reflectivity: 0.0,
            diffuse: 1.0,
            texture: None,
        })
    }

    fn sphere_entry(x: f32) -> BoundedEntry {
        BoundedEntry::Sphere(SceneObject::new(Sphere::new(point3(x, 0.0, -10.0), 0.5), vec![material()], None))
    }

    #[test]
    fn empty_input_builds_an_empty_leaf() {
        let tree = build(Vec::new(), &MedianPartitioner, DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECTS_PER_NODE);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn bvh_nearest_hit_matches_flat_scan() {
        let entries: Vec<_> = (0..20).map(|i| sphere_entry(i as f32 * 2.0)).collect();
        let tree = build(entries, &MedianPartitioner, DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECTS_PER_NODE);

        let ray = Ray::new(point3(6.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)));
        let mut best = None;
        tree.query_nearest(&ray, &mut best);
        let hit = best.expect("ray aimed at sphere row must hit");
        assert!((hit.t() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn every_partition_bv_encloses_its_children() {
        let entries: Vec<_> = (0..9).map(|i| sphere_entry(i as f32 * 3.0)).collect();
        let tree = build(entries, &MeanPartitioner::new(1), DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECTS_PER_NODE);
        assert_tree_bounds_enclose_children(&tree);
    }

    fn assert_tree_bounds_enclose_children(node: &BvhNode) {
        if let BvhNode::Partition(children) = node {
            for (child, bv) in children {
                if let BvhNode::Partition(grandchildren) = child.as_ref() {
                    for (_, child_bv) in grandchildren {
                        assert!(child_bv.min().x >= bv.min().x - 1e-4);
                        assert!(child_bv.max().x <= bv.max().x + 1e-4);
                    }
                }
                assert_tree_bounds_enclose_children(child);
            }
        }
    }
}
