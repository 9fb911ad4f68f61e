// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Scene objects: a shape paired with its materials and identity, plus the polymorphic
//! "any shape" escape hatch for callers who need a shape type this crate doesn't know
//! about at compile time.

use crate::material::{MediumMaterial, SurfaceMaterial};
use crate::math::{Aabb, Point2, Point3, Ray};
use crate::raycast::RaycastHit;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A globally-unique, process-wide monotonic identifier. Exists only so hit resolution
/// is stable across construction order — any strategy producing unique ids within a
/// scene would do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneObjectId(u64);

static NEXT_SCENE_OBJECT_ID: AtomicU64 = AtomicU64::new(0);

impl SceneObjectId {
    pub fn next() -> SceneObjectId {
        SceneObjectId(NEXT_SCENE_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A shape plus its materials and identity. `Shape` is one of the concrete types in
/// [`crate::shape`]; `S::NUM_MATERIALS_PER_SHAPE` bounds `materials.len()`.
#[derive(Clone)]
pub struct SceneObject<Shape> {
    pub shape: Shape,
    pub materials: Vec<Arc<SurfaceMaterial>>,
    /// The medium filling this shape's interior, if it has volume.
    pub medium: Option<Arc<MediumMaterial>>,
    id: SceneObjectId,
}

impl<Shape> SceneObject<Shape> {
    pub fn new(shape: Shape, materials: Vec<Arc<SurfaceMaterial>>, medium: Option<Arc<MediumMaterial>>) -> SceneObject<Shape> {
        SceneObject { shape, materials, medium, id: SceneObjectId::next() }
    }

    pub fn id(&self) -> SceneObjectId {
        self.id
    }

    pub fn material(&self, index: usize) -> &Arc<SurfaceMaterial> {
        &self.materials[index]
    }

    pub fn is_light(&self) -> bool {
        self.materials.iter().any(|m| m.is_light())
    }
}

/// The virtual-dispatch escape hatch for shapes not among this crate's compile-time set.
/// Ownership (exclusive vs. shared) is expressed by wrapping `Box<dyn AnyShape>` or
/// `Arc<dyn AnyShape>` rather than by a duplicated class hierarchy.
pub trait AnyShape: Send + Sync {
    fn center(&self) -> Point3;
    /// `None` for unbounded shapes (e.g. an infinite plane implemented behind this trait).
    fn aabb(&self) -> Option<Aabb>;
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit>;
    fn resolve_uv(&self, hit_point: Point3) -> Point2;
    fn has_volume(&self) -> bool;
    fn is_locally_continuable(&self) -> bool;
    fn material(&self, index: usize) -> &Arc<SurfaceMaterial>;
    fn medium(&self) -> Option<&Arc<MediumMaterial>>;
    fn is_light(&self) -> bool;
    fn id(&self) -> SceneObjectId;
    /// Deep-copies the shape behind this trait object. Only called by the "unique"
    /// ownership variants, which need `Clone` semantics despite holding a `Box<dyn _>`.
    fn clone_box(&self) -> Box<dyn AnyShape>;
}

/// A bounded shape exclusively owned behind virtual dispatch. Cloning performs a deep
/// copy via [`AnyShape::clone_box`].
pub struct BoundedUniqueAnyShape(pub Box<dyn AnyShape>);

impl Clone for BoundedUniqueAnyShape {
    fn clone(&self) -> Self {
        BoundedUniqueAnyShape(self.0.clone_box())
    }
}

/// A bounded shape shared with other owners; cloning shares the same underlying shape.
#[derive(Clone)]
pub struct BoundedSharedAnyShape(pub Arc<dyn AnyShape>);

/// An unbounded shape exclusively owned behind virtual dispatch.
pub struct UnboundedUniqueAnyShape(pub Box<dyn AnyShape>);

impl Clone for UnboundedUniqueAnyShape {
    fn clone(&self) -> Self {
        UnboundedUniqueAnyShape(self.0.clone_box())
    }
}

/// An unbounded shape shared with other owners.
#[derive(Clone)]
pub struct UnboundedSharedAnyShape(pub Arc<dyn AnyShape>);
