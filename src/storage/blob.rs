// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

use super::array::{AnyShapeArray, HomogeneousObjectArray, ResolvableHit};
use crate::math::Ray;
use crate::sceneobject::{BoundedSharedAnyShape, BoundedUniqueAnyShape, SceneObject};
use crate::shape::{AaBox, MeshFace, Sphere, Triangle};
use strum::{Display, EnumIter};

/// The finite set of bounded shape kinds a [`SceneBlob`] indexes by type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ShapeKind {
    Sphere,
    AaBox,
    Triangle,
    MeshFace,
    BoundedAny,
}

/// A type-indexed tuple of homogeneous arrays, one per bounded shape type. `query_nearest`
/// dispatches a linear scan over every non-empty array; this is equivalent to a BVH with
/// a single leaf, and is what a [`crate::bvh`] leaf node wraps internally.
#[derive(Default)]
pub struct SceneBlob {
    spheres: HomogeneousObjectArray<Sphere>,
    aaboxes: HomogeneousObjectArray<AaBox>,
    triangles: HomogeneousObjectArray<Triangle>,
    mesh_faces: HomogeneousObjectArray<MeshFace>,
    any_shapes: AnyShapeArray,
}

impl SceneBlob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sphere(&mut self, object: SceneObject<Sphere>) {
        self.spheres.add(object);
    }

    pub fn add_aabox(&mut self, object: SceneObject<AaBox>) {
        self.aaboxes.add(object);
    }

    pub fn add_triangle(&mut self, object: SceneObject<Triangle>) {
        self.triangles.add(object);
    }

    pub fn add_mesh_face(&mut self, object: SceneObject<MeshFace>) {
        self.mesh_faces.add(object);
    }

    pub fn add_any_unique(&mut self, shape: BoundedUniqueAnyShape) {
        self.any_shapes.add_unique(shape);
    }

    pub fn add_any_shared(&mut self, shape: BoundedSharedAnyShape) {
        self.any_shapes.add_shared(shape);
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
            && self.aaboxes.is_empty()
            && self.triangles.is_empty()
            && self.mesh_faces.is_empty()
            && self.any_shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spheres.len() + self.aaboxes.len() + self.triangles.len() + self.mesh_faces.len() + self.any_shapes.len()
    }

    /// Visits each populated shape kind with its logical object count, for the one-line
    /// per-kind construction log.
    pub fn for_each_kind(&self, mut visit: impl FnMut(ShapeKind, usize)) {
        for (kind, count) in [
            (ShapeKind::Sphere, self.spheres.len()),
            (ShapeKind::AaBox, self.aaboxes.len()),
            (ShapeKind::Triangle, self.triangles.len()),
            (ShapeKind::MeshFace, self.mesh_faces.len()),
            (ShapeKind::BoundedAny, self.any_shapes.len()),
        ] {
            if count > 0 {
                visit(kind, count);
            }
        }
    }

    pub fn query_nearest<'a>(&'a self, ray: &Ray, best: &mut Option<ResolvableHit<'a>>) -> bool {
        let mut any = false;
        any |= self.spheres.query_nearest(ray, best);
        any |= self.aaboxes.query_nearest(ray, best);
        any |= self.triangles.query_nearest(ray, best);
        any |= self.mesh_faces.query_nearest(ray, best);
        any |= self.any_shapes.query_nearest(ray, best);
        any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::SurfaceMaterial;
    use crate::math::{Normal3, Rgb};
    use cgmath::{point3, vec3};
    use std::sync::Arc;

    fn material() -> Arc<SurfaceMaterial> {
        Arc::new(SurfaceMaterial {
            surface_color: Rgb::new(0.0, 1.0, 0.0),
            emission_color: Rgb::ZERO,
            transparency: 0.0,
            reflectivity: 0.0,
            diffuse: 1.0,
            texture: None,
        })
    }

    #[test]
    fn query_nearest_finds_closest_across_shape_types() {
        let mut blob = SceneBlob::new();
        blob.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 0.0, -10.0), 1.0), vec![material()], None));
        blob.add_aabox(SceneObject::new(
            AaBox::new(point3(-1.0, -1.0, -3.0), point3(1.0, 1.0, -2.0)),
            vec![material()],
            None,
        ));

        let ray = Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)));
        let mut best = None;
        assert!(blob.query_nearest(&ray, &mut best));
        assert!((best.unwrap().t() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn empty_blob_reports_empty() {
        assert!(SceneBlob::new().is_empty());
    }
}
