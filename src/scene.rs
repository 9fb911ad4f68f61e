// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The top-level scene: space-partitioned storage for bounded objects, a linear pool of
//! unbounded ones, a pre-scanned light list, a background color, and an optional ambient
//! medium. Built once via [`SceneBuilder`] and immutable afterward.

use crate::bvh::{self, BoundedEntry, BvhNode, Partitioner};
use crate::material::MediumMaterial;
use crate::math::{Point3, Rgb};
use crate::math::Ray;
use crate::sceneobject::{
    BoundedSharedAnyShape, BoundedUniqueAnyShape, SceneObject, SceneObjectId, UnboundedSharedAnyShape,
    UnboundedUniqueAnyShape,
};
use crate::shape::{AaBox, MeshFace, Plane, Sphere, Triangle};
use crate::storage::{HomogeneousObjectArray, ResolvableHit, SceneBlob, UnboundedAnyShapeArray};
use log::{debug, info};
use std::sync::Arc;

/// A light's world-space position plus the id of the bounded object it belongs to, so
/// the integrator's shadow test can tell "hit the light" from "hit something else".
#[derive(Clone, Copy, Debug)]
pub struct LightHandle {
    center: Point3,
    id: SceneObjectId,
}

impl LightHandle {
    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn id(&self) -> SceneObjectId {
        self.id
    }
}

enum Storage {
    Bvh(BvhNode),
    Blob(SceneBlob),
}

impl Storage {
    fn query_nearest<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>) {
        match self {
            Storage::Bvh(node) => node.query_nearest(ray, best),
            Storage::Blob(blob) => {
                blob.query_nearest(ray, best);
            }
        }
    }
}

/// Objects with no finite bounding box: planes, and any-shape objects behind the
/// unbounded ownership variants. Never placed in a BVH leaf; always scanned linearly.
#[derive(Default)]
struct UnboundedPool {
    planes: HomogeneousObjectArray<Plane>,
    any_shapes: UnboundedAnyShapeArray,
}

impl UnboundedPool {
    fn is_empty(&self) -> bool {
        self.planes.is_empty() && self.any_shapes.is_empty()
    }

    fn len(&self) -> usize {
        self.planes.len() + self.any_shapes.len()
    }

    fn query_nearest<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>) {
        self.planes.query_nearest(ray, best);
        self.any_shapes.query_nearest(ray, best);
    }
}

/// Which space-partitioning storage a [`SceneBuilder`] should assemble.
pub enum StorageKind<'p> {
    Bvh { partitioner: &'p dyn Partitioner, max_depth: u32, max_objects_per_node: usize },
    Blob,
}

impl<'p> StorageKind<'p> {
    pub fn bvh(partitioner: &'p dyn Partitioner) -> StorageKind<'p> {
        StorageKind::Bvh { partitioner, max_depth: bvh::DEFAULT_MAX_DEPTH, max_objects_per_node: bvh::DEFAULT_MAX_OBJECTS_PER_NODE }
    }
}

/// Incrementally assembles a [`Scene`]. Insert scene objects in any order, then call
/// [`SceneBuilder::build`], which scans bounded objects for lights and builds storage.
#[derive(Default)]
pub struct SceneBuilder {
    bounded: Vec<BoundedEntry>,
    unbounded: UnboundedPool,
    background_color: Rgb,
    ambient_medium: Option<Arc<MediumMaterial>>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_background_color(&mut self, color: Rgb) -> &mut Self {
        self.background_color = color;
        self
    }

    pub fn set_ambient_medium(&mut self, medium: Arc<MediumMaterial>) -> &mut Self {
        self.ambient_medium = Some(medium);
        self
    }

    pub fn add_sphere(&mut self, object: SceneObject<Sphere>) -> &mut Self {
        self.bounded.push(BoundedEntry::Sphere(object));
        self
    }

    pub fn add_aabox(&mut self, object: SceneObject<AaBox>) -> &mut Self {
        self.bounded.push(BoundedEntry::AaBox(object));
        self
    }

    pub fn add_triangle(&mut self, object: SceneObject<Triangle>) -> &mut Self {
        self.bounded.push(BoundedEntry::Triangle(object));
        self
    }

    pub fn add_mesh_face(&mut self, object: SceneObject<MeshFace>) -> &mut Self {
        self.bounded.push(BoundedEntry::MeshFace(object));
        self
    }

    pub fn add_bounded_any_unique(&mut self, shape: BoundedUniqueAnyShape) -> &mut Self {
        self.bounded.push(BoundedEntry::AnyUnique(shape));
        self
    }

    pub fn add_bounded_any_shared(&mut self, shape: BoundedSharedAnyShape) -> &mut Self {
        self.bounded.push(BoundedEntry::AnyShared(shape));
        self
    }

    pub fn add_plane(&mut self, object: SceneObject<Plane>) -> &mut Self {
        self.unbounded.planes.add(object);
        self
    }

    pub fn add_unbounded_any_unique(&mut self, shape: UnboundedUniqueAnyShape) -> &mut Self {
        self.unbounded.any_shapes.add_unique(shape);
        self
    }

    pub fn add_unbounded_any_shared(&mut self, shape: UnboundedSharedAnyShape) -> &mut Self {
        self.unbounded.any_shapes.add_shared(shape);
        self
    }

    pub fn build(self, storage_kind: StorageKind) -> Scene {
        let lights: Vec<LightHandle> =
            self.bounded.iter().filter(|entry| entry.is_light()).map(|entry| LightHandle { center: entry.center(), id: entry.id() }).collect();

        let bounded_count = self.bounded.len();
        let storage = match storage_kind {
            StorageKind::Bvh { partitioner, max_depth, max_objects_per_node } => {
                let tree = bvh::build(self.bounded, partitioner, max_depth, max_objects_per_node);
                debug!("scene: built bvh over {} bounded objects, depth {}, {} leaves", bounded_count, tree.depth(), tree.leaf_count());
                Storage::Bvh(tree)
            }
            StorageKind::Blob => {
                let mut blob = SceneBlob::new();
                for entry in self.bounded {
                    match entry {
                        BoundedEntry::Sphere(o) => blob.add_sphere(o),
                        BoundedEntry::AaBox(o) => blob.add_aabox(o),
                        BoundedEntry::Triangle(o) => blob.add_triangle(o),
                        BoundedEntry::MeshFace(o) => blob.add_mesh_face(o),
                        BoundedEntry::AnyUnique(s) => blob.add_any_unique(s),
                        BoundedEntry::AnyShared(s) => blob.add_any_shared(s),
                    }
                }
                blob.for_each_kind(|kind, count| debug!("scene: {} {}", count, kind));
                Storage::Blob(blob)
            }
        };

        info!("scene: {} bounded, {} unbounded, {} lights", bounded_count, self.unbounded.len(), lights.len());

        Scene { storage, unbounded: self.unbounded, lights, background_color: self.background_color, ambient_medium: self.ambient_medium }
    }
}

/// An assembled, immutable scene ready for rendering.
pub struct Scene {
    storage: Storage,
    unbounded: UnboundedPool,
    lights: Vec<LightHandle>,
    background_color: Rgb,
    ambient_medium: Option<Arc<MediumMaterial>>,
}

impl Scene {
    /// Nearest hit across both the bounded storage and the unbounded pool. The unbounded
    /// pool is scanned first so its result seeds the pruning threshold for storage
    /// traversal, per the scene's query contract.
    pub fn query_nearest<'a>(&'a self, ray: &Ray) -> Option<ResolvableHit<'a>> {
        let mut best = None;
        self.unbounded.query_nearest(ray, &mut best);
        self.storage.query_nearest(ray, &mut best);
        best
    }

    pub fn lights(&self) -> &[LightHandle] {
        &self.lights
    }

    pub fn background_color(&self) -> Rgb {
        self.background_color
    }

    pub fn ambient_medium(&self) -> Option<&Arc<MediumMaterial>> {
        self.ambient_medium.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.unbounded.is_empty()
            && match &self.storage {
                Storage::Bvh(node) => node.leaf_count() == 1 && node.depth() == 1,
                Storage::Blob(blob) => blob.is_empty(),
            }
    }
}
