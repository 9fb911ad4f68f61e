// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The type-erased-just-enough input to BVH construction: one entry per bounded scene
//! object, carrying its shape-typed payload plus the `aabb`/`center` a partitioner needs
//! without caring which concrete shape it is.

use crate::math::{Aabb, Point3};
use crate::sceneobject::{BoundedSharedAnyShape, BoundedUniqueAnyShape, SceneObject, SceneObjectId};
use crate::shape::{AaBox, MeshFace, Sphere, Triangle};

pub enum BoundedEntry {
    Sphere(SceneObject<Sphere>),
    AaBox(SceneObject<AaBox>),
    Triangle(SceneObject<Triangle>),
    MeshFace(SceneObject<MeshFace>),
    AnyUnique(BoundedUniqueAnyShape),
    AnyShared(BoundedSharedAnyShape),
}

impl BoundedEntry {
    pub fn aabb(&self) -> Aabb {
        match self {
            BoundedEntry::Sphere(o) => o.shape.aabb(),
            BoundedEntry::AaBox(o) => o.shape.aabb(),
            BoundedEntry::Triangle(o) => o.shape.aabb(),
            BoundedEntry::MeshFace(o) => o.shape.aabb(),
            BoundedEntry::AnyUnique(s) => s.0.aabb().expect("bounded any-shape must have an aabb"),
            BoundedEntry::AnyShared(s) => s.0.aabb().expect("bounded any-shape must have an aabb"),
        }
    }

    pub fn center(&self) -> Point3 {
        match self {
            BoundedEntry::Sphere(o) => o.shape.center(),
            BoundedEntry::AaBox(o) => o.shape.center(),
            BoundedEntry::Triangle(o) => o.shape.center(),
            BoundedEntry::MeshFace(o) => o.shape.center(),
            BoundedEntry::AnyUnique(s) => s.0.center(),
            BoundedEntry::AnyShared(s) => s.0.center(),
        }
    }

    pub fn is_light(&self) -> bool {
        match self {
            BoundedEntry::Sphere(o) => o.is_light(),
            BoundedEntry::AaBox(o) => o.is_light(),
            BoundedEntry::Triangle(o) => o.is_light(),
            BoundedEntry::MeshFace(o) => o.is_light(),
            BoundedEntry::AnyUnique(s) => s.0.is_light(),
            BoundedEntry::AnyShared(s) => s.0.is_light(),
        }
    }

    pub fn id(&self) -> SceneObjectId {
        match self {
            BoundedEntry::Sphere(o) => o.id(),
            BoundedEntry::AaBox(o) => o.id(),
            BoundedEntry::Triangle(o) => o.id(),
            BoundedEntry::MeshFace(o) => o.id(),
            BoundedEntry::AnyUnique(s) => s.0.id(),
            BoundedEntry::AnyShared(s) => s.0.id(),
        }
    }
}
