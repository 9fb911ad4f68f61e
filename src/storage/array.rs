// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Dense, homogeneous storage for one shape type: the unit the BVH's leaves and the
//! scene's flat-blob storage are both built from.

use crate::material::MediumMaterial;
use crate::math::{Normal3, Point2, Point3, Ray};
use crate::raycast::{RaycastHit, Raycastable};
use crate::sceneobject::{
    AnyShape, BoundedSharedAnyShape, BoundedUniqueAnyShape, SceneObject, SceneObjectId, UnboundedSharedAnyShape,
    UnboundedUniqueAnyShape,
};
use crate::shape::{ShapeTraits, TextureCoordinates};
use std::sync::Arc;

/// The part of a hit that doesn't depend on borrowing the owning array: enough to
/// re-test the same shape (`next`) or hand to the array's shader (`resolve`).
#[derive(Clone, Copy, Debug)]
pub struct LocalHit {
    pub t: f32,
    pub point: Point3,
    pub normal: Normal3,
    pub object_index: usize,
    pub material_index: usize,
    pub is_inside: bool,
    pub object_id: SceneObjectId,
}

/// A lightweight, cheaply-produced hit result: a [`LocalHit`] plus a borrowed reference
/// to the array that produced it, used to resolve full shading or continue locally.
/// The borrow is the only "back-reference": the hit cannot outlive the scene that owns
/// the array.
pub struct ResolvableHit<'a> {
    pub local: LocalHit,
    owner: &'a dyn ResolvingArray,
}

impl<'a> ResolvableHit<'a> {
    pub fn new(local: LocalHit, owner: &'a dyn ResolvingArray) -> ResolvableHit<'a> {
        ResolvableHit { local, owner }
    }

    pub fn t(&self) -> f32 {
        self.local.t
    }

    pub fn object_id(&self) -> SceneObjectId {
        self.local.object_id
    }

    pub fn resolve(&self) -> ResolvedHit {
        self.owner.resolve(&self.local)
    }

    /// Re-tests only the shape this hit came from, for continuing inside a convex
    /// volume without a full scene requery. `None` if the shape is not locally
    /// continuable or the ray misses it (floating point precision loss at the surface).
    pub fn next(&self, ray: &Ray) -> Option<ResolvableHit<'a>> {
        self.owner.query_local(self.local.object_index, ray).map(|local| ResolvableHit { local, owner: self.owner })
    }
}

/// A resolvable hit's shaded outputs, produced on demand by the owning array's shader.
#[derive(Clone)]
pub struct ResolvedHit {
    pub t: f32,
    pub point: Point3,
    pub normal: Normal3,
    pub uv: Point2,
    pub surface_color: crate::math::Rgb,
    pub emission_color: crate::math::Rgb,
    pub transparency: f32,
    pub reflectivity: f32,
    pub diffuse: f32,
    pub medium: Option<Arc<MediumMaterial>>,
    pub has_volume: bool,
    pub is_locally_continuable: bool,
    pub is_inside: bool,
    pub object_id: SceneObjectId,
}

/// Implemented by every homogeneous array so a [`ResolvableHit`] can call back into its
/// owner without knowing the concrete shape type.
pub trait ResolvingArray: Send + Sync {
    fn resolve(&self, local: &LocalHit) -> ResolvedHit;
    fn query_local(&self, object_index: usize, ray: &Ray) -> Option<LocalHit>;
}

/// Dense storage for every scene object of one shape type. Shapes are not packed into
/// SIMD lanes (`spec.md` §9 allows a first implementation to skip this); each logical
/// object occupies one `Vec` slot.
pub struct HomogeneousObjectArray<Shape> {
    objects: Vec<SceneObject<Shape>>,
}

impl<Shape> Default for HomogeneousObjectArray<Shape> {
    fn default() -> Self {
        HomogeneousObjectArray { objects: Vec::new() }
    }
}

impl<Shape> HomogeneousObjectArray<Shape> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject<Shape>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject<Shape>> {
        self.objects.iter()
    }
}

impl<Shape> HomogeneousObjectArray<Shape>
where
    Shape: ShapeTraits + Raycastable + TextureCoordinates,
{
    /// Scans every object, updating `best` in place whenever a strictly closer hit is
    /// found. Returns whether `best` changed. `best` doubles as the pruning threshold:
    /// candidates no closer than the incoming `best.t` are rejected without allocating.
    pub fn query_nearest<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>) -> bool
    where
        Self: ResolvingArray,
    {
        let mut nearest_t = best.as_ref().map(|h| h.local.t).unwrap_or(f32::INFINITY);
        let mut found = false;
        for (index, object) in self.objects.iter().enumerate() {
            let hit = object.shape.raycast(ray);
            crate::perf::record_object_raycast(hit.is_some());
            if let Some(hit) = hit {
                if hit.t < nearest_t {
                    nearest_t = hit.t;
                    found = true;
                    *best = Some(ResolvableHit::new(local_hit(hit, index, object.id()), self));
                }
            }
        }
        found
    }
}

fn local_hit(hit: RaycastHit, object_index: usize, object_id: SceneObjectId) -> LocalHit {
    LocalHit {
        t: hit.t,
        point: hit.point,
        normal: hit.normal,
        object_index,
        material_index: hit.material_index,
        is_inside: hit.is_inside,
        object_id,
    }
}

impl<Shape> ResolvingArray for HomogeneousObjectArray<Shape>
where
    Shape: ShapeTraits + Raycastable + TextureCoordinates + Send + Sync,
{
    fn resolve(&self, local: &LocalHit) -> ResolvedHit {
        let object = &self.objects[local.object_index];
        let material = object.material(local.material_index);
        let uv = object.shape.uv_at(local.point, local.normal);
        ResolvedHit {
            t: local.t,
            point: local.point,
            normal: local.normal,
            uv,
            surface_color: material.surface_color * material.sample_texture(uv),
            emission_color: material.emission_color,
            transparency: material.transparency,
            reflectivity: material.reflectivity,
            diffuse: material.diffuse,
            medium: object.medium.clone(),
            has_volume: Shape::HAS_VOLUME,
            is_locally_continuable: Shape::IS_LOCALLY_CONTINUABLE,
            is_inside: local.is_inside,
            object_id: local.object_id,
        }
    }

    fn query_local(&self, object_index: usize, ray: &Ray) -> Option<LocalHit> {
        if !Shape::IS_LOCALLY_CONTINUABLE {
            return None;
        }
        let object = &self.objects[object_index];
        let hit = object.shape.raycast(ray)?;
        Some(local_hit(hit, object_index, object.id()))
    }
}

/// Storage for the polymorphic "any shape" escape hatch: bounded shapes whose concrete
/// type isn't among this crate's compile-time set. Holds both ownership variants side
/// by side since both are queried identically through the [`AnyShape`] trait object.
#[derive(Default)]
pub struct AnyShapeArray {
    unique: Vec<BoundedUniqueAnyShape>,
    shared: Vec<BoundedSharedAnyShape>,
}

impl AnyShapeArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unique(&mut self, shape: BoundedUniqueAnyShape) {
        self.unique.push(shape);
    }

    pub fn add_shared(&mut self, shape: BoundedSharedAnyShape) {
        self.shared.push(shape);
    }

    pub fn len(&self) -> usize {
        self.unique.len() + self.shared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unique.is_empty() && self.shared.is_empty()
    }

    fn get(&self, index: usize) -> &dyn AnyShape {
        if index < self.unique.len() {
            self.unique[index].0.as_ref()
        } else {
            self.shared[index - self.unique.len()].0.as_ref()
        }
    }

    pub fn query_nearest<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>) -> bool {
        let mut nearest_t = best.as_ref().map(|h| h.local.t).unwrap_or(f32::INFINITY);
        let mut found = false;
        let total = self.unique.len() + self.shared.len();
        for index in 0..total {
            let shape = self.get(index);
            let hit = shape.raycast(ray);
            crate::perf::record_object_raycast(hit.is_some());
            if let Some(hit) = hit {
                if hit.t < nearest_t {
                    nearest_t = hit.t;
                    found = true;
                    *best = Some(ResolvableHit::new(
                        LocalHit {
                            t: hit.t,
                            point: hit.point,
                            normal: hit.normal,
                            object_index: index,
                            material_index: hit.material_index,
                            is_inside: hit.is_inside,
                            object_id: shape.id(),
                        },
                        self,
                    ));
                }
            }
        }
        found
    }
}

impl ResolvingArray for AnyShapeArray {
    fn resolve(&self, local: &LocalHit) -> ResolvedHit {
        let shape = self.get(local.object_index);
        let material = shape.material(local.material_index);
        let uv = shape.resolve_uv(local.point);
        ResolvedHit {
            t: local.t,
            point: local.point,
            normal: local.normal,
            uv,
            surface_color: material.surface_color * material.sample_texture(uv),
            emission_color: material.emission_color,
            transparency: material.transparency,
            reflectivity: material.reflectivity,
            diffuse: material.diffuse,
            medium: shape.medium().cloned(),
            has_volume: shape.has_volume(),
            is_locally_continuable: shape.is_locally_continuable(),
            is_inside: local.is_inside,
            object_id: local.object_id,
        }
    }

    fn query_local(&self, object_index: usize, ray: &Ray) -> Option<LocalHit> {
        let shape = self.get(object_index);
        if !shape.is_locally_continuable() {
            return None;
        }
        let hit = shape.raycast(ray)?;
        Some(LocalHit {
            t: hit.t,
            point: hit.point,
            normal: hit.normal,
            object_index,
            material_index: hit.material_index,
            is_inside: hit.is_inside,
            object_id: shape.id(),
        })
    }
}

/// The unbounded counterpart of [`AnyShapeArray`]: shapes with no finite bounding box
/// (e.g. an infinite plane behind the [`AnyShape`] escape hatch), always scanned
/// linearly since they can never be placed in a BVH leaf.
#[derive(Default)]
pub struct UnboundedAnyShapeArray {
    unique: Vec<UnboundedUniqueAnyShape>,
    shared: Vec<UnboundedSharedAnyShape>,
}

impl UnboundedAnyShapeArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unique(&mut self, shape: UnboundedUniqueAnyShape) {
        self.unique.push(shape);
    }

    pub fn add_shared(&mut self, shape: UnboundedSharedAnyShape) {
        self.shared.push(shape);
    }

    pub fn is_empty(&self) -> bool {
        self.unique.is_empty() && self.shared.is_empty()
    }

    pub fn len(&self) -> usize {
        self.unique.len() + self.shared.len()
    }

    fn get(&self, index: usize) -> &dyn AnyShape {
        if index < self.unique.len() {
            self.unique[index].0.as_ref()
        } else {
            self.shared[index - self.unique.len()].0.as_ref()
        }
    }

    pub fn query_nearest<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>) -> bool {
        let mut nearest_t = best.as_ref().map(|h| h.local.t).unwrap_or(f32::INFINITY);
        let mut found = false;
        for index in 0..self.len() {
            let shape = self.get(index);
            let hit = shape.raycast(ray);
            crate::perf::record_object_raycast(hit.is_some());
            if let Some(hit) = hit {
                if hit.t < nearest_t {
                    nearest_t = hit.t;
                    found = true;
                    *best = Some(ResolvableHit::new(
                        LocalHit {
                            t: hit.t,
                            point: hit.point,
                            normal: hit.normal,
                            object_index: index,
                            material_index: hit.material_index,
                            is_inside: hit.is_inside,
                            object_id: shape.id(),
                        },
                        self,
                    ));
                }
            }
        }
        found
    }
}

impl ResolvingArray for UnboundedAnyShapeArray {
    fn resolve(&self, local: &LocalHit) -> ResolvedHit {
        let shape = self.get(local.object_index);
        let material = shape.material(local.material_index);
        let uv = shape.resolve_uv(local.point);
        ResolvedHit {
            t: local.t,
            point: local.point,
            normal: local.normal,
            uv,
            surface_color: material.surface_color * material.sample_texture(uv),
            emission_color: material.emission_color,
            transparency: material.transparency,
            reflectivity: material.reflectivity,
            diffuse: material.diffuse,
            medium: shape.medium().cloned(),
            has_volume: shape.has_volume(),
            is_locally_continuable: shape.is_locally_continuable(),
            is_inside: local.is_inside,
            object_id: local.object_id,
        }
    }

    fn query_local(&self, object_index: usize, ray: &Ray) -> Option<LocalHit> {
        let shape = self.get(object_index);
        if !shape.is_locally_continuable() {
            return None;
        }
        let hit = shape.raycast(ray)?;
        Some(LocalHit {
            t: hit.t,
            point: hit.point,
            normal: hit.normal,
            object_index,
            material_index: hit.material_index,
            is_inside: hit.is_inside,
            object_id: shape.id(),
        })
    }
}
