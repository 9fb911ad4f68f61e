// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The finite set of concrete shape types and their compile-time trait descriptors.
//!
//! Prefers a closed set of value types dispatched by `match`/generics over a class
//! hierarchy: each shape type implements [`ShapeTraits`] as compile-time constants
//! instead of virtual-dispatched accessor methods.

use crate::error::SceneBuildError;
use crate::math::{Aabb, Normal3, Point2, Point3, Vec3};
use crate::raycast::triangle_barycentric_uv;
use cgmath::{EuclideanSpace, InnerSpace};
use std::f32::consts::PI;
use std::sync::Arc;

/// Maps a point known to lie on a shape's surface to texture coordinates. Formulas are
/// not specified by the source beyond "a texture maps UV to color"; these are the usual
/// conventions (spherical UV for a sphere, a tangent-plane projection for flat shapes).
pub trait TextureCoordinates {
    fn uv_at(&self, point: Point3, normal: Normal3) -> Point2;
}

impl TextureCoordinates for Sphere {
    fn uv_at(&self, point: Point3, _normal: Normal3) -> Point2 {
        let d = (point - self.center) / self.radius;
        let u = 0.5 + d.z.atan2(d.x) / (2.0 * PI);
        let v = 0.5 - d.y.clamp(-1.0, 1.0).asin() / PI;
        Point2::new(u, v)
    }
}

impl TextureCoordinates for Plane {
    fn uv_at(&self, point: Point3, _normal: Normal3) -> Point2 {
        let (tangent, bitangent) = tangent_basis(self.normal);
        let local = point.to_vec();
        Point2::new(local.dot(tangent), local.dot(bitangent))
    }
}

impl TextureCoordinates for AaBox {
    fn uv_at(&self, point: Point3, normal: Normal3) -> Point2 {
        let (tangent, bitangent) = tangent_basis(normal);
        let local = point - self.center();
        Point2::new(local.dot(tangent), local.dot(bitangent))
    }
}

impl TextureCoordinates for Triangle {
    fn uv_at(&self, point: Point3, _normal: Normal3) -> Point2 {
        triangle_barycentric_uv(self, point)
    }
}

impl TextureCoordinates for MeshFace {
    fn uv_at(&self, point: Point3, normal: Normal3) -> Point2 {
        self.triangle().uv_at(point, normal)
    }
}

/// An arbitrary orthonormal tangent/bitangent pair for a surface with the given normal,
/// used to project a point into a 2D texture space.
fn tangent_basis(normal: Normal3) -> (Vec3, Vec3) {
    let n = normal.as_vec3();
    let helper = if n.x.abs() > 0.9 { Vec3::new(0.0, 1.0, 0.0) } else { Vec3::new(1.0, 0.0, 0.0) };
    let tangent = helper.cross(n).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}

/// Compile-time facts about a shape type, read by the scene object array and the BVH
/// builder without any runtime dispatch.
pub trait ShapeTraits {
    /// Materials per shape used by rays finishing inside a shape (e.g. entry/exit faces
    /// of a volume) as opposed to a flat surface, which only ever needs one.
    const NUM_MATERIALS_PER_SHAPE: usize;
    /// Whether the shape encloses a volume a ray can be "inside" of.
    const HAS_VOLUME: bool;
    /// Whether a hit on this shape can be continued via `queryLocal` rather than a full
    /// scene requery (true only for shapes where "inside" is well-defined and convex).
    const IS_LOCALLY_CONTINUABLE: bool;
    /// Whether the shape has a finite bounding box and can live in the BVH.
    const IS_BOUNDED: bool;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32) -> Sphere {
        Sphere { center, radius }
    }

    /// As [`Sphere::new`], but rejects a non-positive radius up front instead of letting
    /// the raycast kernel silently treat it as an always-miss shape.
    pub fn checked_new(center: Point3, radius: f32) -> Result<Sphere, SceneBuildError> {
        if radius <= 0.0 {
            return Err(SceneBuildError::DegenerateShape {
                shape_kind: "Sphere",
                reason: format!("radius must be positive, got {}", radius),
            });
        }
        Ok(Sphere::new(center, radius))
    }

    pub fn aabb(&self) -> Aabb {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Aabb::new(self.center - r, self.center + r)
    }

    pub fn center(&self) -> Point3 {
        self.center
    }
}

impl ShapeTraits for Sphere {
    const NUM_MATERIALS_PER_SHAPE: usize = 1;
    const HAS_VOLUME: bool = true;
    const IS_LOCALLY_CONTINUABLE: bool = true;
    const IS_BOUNDED: bool = true;
}

/// A single-sided, infinite plane. Per its raycast contract, a ray that approaches from
/// the back (direction and normal pointing the same way) always misses; represent a
/// double-sided plane as two opposing [`Plane`]s.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Normal3,
    /// Signed distance from the origin along `normal`.
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Normal3, distance: f32) -> Plane {
        Plane { normal, distance }
    }
}

impl ShapeTraits for Plane {
    const NUM_MATERIALS_PER_SHAPE: usize = 1;
    const HAS_VOLUME: bool = false;
    const IS_LOCALLY_CONTINUABLE: bool = false;
    const IS_BOUNDED: bool = false;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AaBox {
    pub min: Point3,
    pub max: Point3,
}

impl AaBox {
    pub fn new(min: Point3, max: Point3) -> AaBox {
        AaBox { min, max }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }

    pub fn center(&self) -> Point3 {
        self.min + (self.max - self.min) * 0.5
    }
}

impl ShapeTraits for AaBox {
    const NUM_MATERIALS_PER_SHAPE: usize = 1;
    const HAS_VOLUME: bool = true;
    const IS_LOCALLY_CONTINUABLE: bool = true;
    const IS_BOUNDED: bool = true;
}

/// A triangle with per-vertex normals and UVs, independent of any shared mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3; 3],
    pub normals: [Normal3; 3],
    pub uvs: [Point2; 3],
}

impl Triangle {
    pub fn new(vertices: [Point3; 3], normals: [Normal3; 3], uvs: [Point2; 3]) -> Triangle {
        Triangle { vertices, normals, uvs }
    }

    /// Triangle with a single face normal substituted at all three vertices; used when
    /// no shading normals are authored.
    pub fn flat(vertices: [Point3; 3], uvs: [Point2; 3]) -> Triangle {
        let normal = Normal3::new((vertices[1] - vertices[0]).cross(vertices[2] - vertices[0]));
        Triangle::new(vertices, [normal, normal, normal], uvs)
    }

    pub fn checked_new(vertices: [Point3; 3], normals: [Normal3; 3], uvs: [Point2; 3]) -> Result<Triangle, SceneBuildError> {
        let area2 = (vertices[1] - vertices[0]).cross(vertices[2] - vertices[0]).magnitude2();
        if area2 < 1e-12 {
            return Err(SceneBuildError::DegenerateShape {
                shape_kind: "Triangle",
                reason: "vertices are collinear (zero area)".to_string(),
            });
        }
        Ok(Triangle::new(vertices, normals, uvs))
    }

    pub fn aabb(&self) -> Aabb {
        let mut bb = Aabb::empty();
        for v in &self.vertices {
            bb.extend_with_point(*v);
        }
        bb
    }

    pub fn center(&self) -> Point3 {
        Point3::new(
            (self.vertices[0].x + self.vertices[1].x + self.vertices[2].x) / 3.0,
            (self.vertices[0].y + self.vertices[1].y + self.vertices[2].y) / 3.0,
            (self.vertices[0].z + self.vertices[1].z + self.vertices[2].z) / 3.0,
        )
    }
}

impl ShapeTraits for Triangle {
    const NUM_MATERIALS_PER_SHAPE: usize = 1;
    const HAS_VOLUME: bool = false;
    const IS_LOCALLY_CONTINUABLE: bool = false;
    const IS_BOUNDED: bool = true;
}

/// Vertex/normal/uv data shared by every face of a closed triangle mesh.
#[derive(Debug)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub normals: Vec<Normal3>,
    pub uvs: Vec<Point2>,
}

/// One face of a closed triangle mesh, referring into a shared [`Mesh`] by index.
/// Closed meshes enclose a volume, unlike a standalone [`Triangle`].
#[derive(Clone, Debug)]
pub struct MeshFace {
    pub mesh: Arc<Mesh>,
    pub indices: [usize; 3],
}

impl MeshFace {
    pub fn new(mesh: Arc<Mesh>, indices: [usize; 3]) -> MeshFace {
        MeshFace { mesh, indices }
    }

    fn vertex(&self, i: usize) -> Point3 {
        self.mesh.vertices[self.indices[i]]
    }

    fn normal(&self, i: usize) -> Normal3 {
        self.mesh.normals[self.indices[i]]
    }

    fn uv(&self, i: usize) -> Point2 {
        self.mesh.uvs[self.indices[i]]
    }

    pub fn triangle(&self) -> Triangle {
        Triangle::new(
            [self.vertex(0), self.vertex(1), self.vertex(2)],
            [self.normal(0), self.normal(1), self.normal(2)],
            [self.uv(0), self.uv(1), self.uv(2)],
        )
    }

    pub fn aabb(&self) -> Aabb {
        self.triangle().aabb()
    }

    pub fn center(&self) -> Point3 {
        self.triangle().center()
    }
}

impl ShapeTraits for MeshFace {
    const NUM_MATERIALS_PER_SHAPE: usize = 1;
    const HAS_VOLUME: bool = true;
    const IS_LOCALLY_CONTINUABLE: bool = false;
    const IS_BOUNDED: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{point2, point3, vec3};

    #[test]
    fn sphere_checked_new_rejects_nonpositive_radius() {
        assert!(Sphere::checked_new(Point3::new(0.0, 0.0, 0.0), 0.0).is_err());
        assert!(Sphere::checked_new(Point3::new(0.0, 0.0, 0.0), -1.0).is_err());
        assert!(Sphere::checked_new(Point3::new(0.0, 0.0, 0.0), 1.0).is_ok());
    }

    #[test]
    fn triangle_checked_new_rejects_collinear_vertices() {
        let v = [point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0), point3(2.0, 0.0, 0.0)];
        let n = Normal3::new(vec3(0.0, 1.0, 0.0));
        let uv = [point2(0.0, 0.0); 3];
        assert!(Triangle::checked_new(v, [n, n, n], uv).is_err());
    }

    #[test]
    fn sphere_aabb_matches_radius() {
        let s = Sphere::new(Point3::new(0.0, 0.0, 0.0), 2.0);
        let bb = s.aabb();
        assert_eq!(bb.min(), point3(-2.0, -2.0, -2.0));
        assert_eq!(bb.max(), point3(2.0, 2.0, 2.0));
    }
}
