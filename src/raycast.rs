// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Ray-vs-primitive intersection kernels, one function per shape type.
//!
//! Tolerances: direction components are clamped below `1e-5` before reciprocal
//! ([`crate::math::Ray`]); no other tolerance is applied here — misses are exact
//! (`t < 0`, discriminant negative, etc.) per `spec.md` §4.1.

use crate::math::{Normal3, Point2, Point3, Ray};
use crate::shape::{AaBox, MeshFace, Plane, Sphere, Triangle};
use cgmath::{EuclideanSpace, InnerSpace};

/// Uniform raycast entry point for every bounded, non-polymorphic shape type stored in
/// a [`crate::storage::array::HomogeneousObjectArray`].
pub trait Raycastable {
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit>;
}

impl Raycastable for Sphere {
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        raycast_sphere(ray, self)
    }
}

impl Raycastable for Plane {
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        raycast_plane(ray, self)
    }
}

impl Raycastable for AaBox {
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        raycast_aabox(ray, self)
    }
}

impl Raycastable for Triangle {
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        raycast_triangle(ray, self)
    }
}

impl Raycastable for MeshFace {
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        raycast_triangle(ray, &self.triangle())
    }
}

/// A cheap intersection result: enough to later resolve full shading via the owning
/// array's shader. `shape_index` is always 0 in this implementation, which does not
/// pack multiple shapes of the same type into SIMD lanes (see `spec.md` §9).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    pub t: f32,
    pub point: Point3,
    pub normal: Normal3,
    pub shape_index: usize,
    pub material_index: usize,
    pub is_inside: bool,
}

/// Sphere: geometric method via projection of the center onto the ray.
pub fn raycast_sphere(ray: &Ray, sphere: &Sphere) -> Option<RaycastHit> {
    let l = sphere.center - ray.origin();
    let dir = ray.direction().as_vec3();
    let t_ca = l.dot(dir);
    if t_ca < 0.0 && l.magnitude2() > sphere.radius * sphere.radius {
        return None;
    }
    let d2 = l.magnitude2() - t_ca * t_ca;
    let r2 = sphere.radius * sphere.radius;
    if d2 > r2 {
        return None;
    }
    let t_hc = (r2 - d2).sqrt();
    let is_inside = t_ca - t_hc < 0.0;
    let t = if is_inside { t_ca + t_hc } else { t_ca - t_hc };
    if t < 0.0 {
        return None;
    }
    let point = ray.at(t);
    let outward = Normal3::new(point - sphere.center);
    let normal = if is_inside { -outward } else { outward };
    Some(RaycastHit { t, point, normal, shape_index: 0, material_index: 0, is_inside })
}

/// Plane: single-sided. Misses a ray that approaches from behind (direction and normal
/// agreeing in sign) rather than treating the plane as double-sided.
pub fn raycast_plane(ray: &Ray, plane: &Plane) -> Option<RaycastHit> {
    let dir = ray.direction().as_vec3();
    let normal = plane.normal.as_vec3();
    let nd = dir.dot(normal);
    if nd >= 0.0 {
        return None;
    }
    let pn = ray.origin().to_vec().dot(normal);
    let t = (plane.distance - pn) / nd;
    if t < 0.0 {
        return None;
    }
    let point = ray.at(t);
    Some(RaycastHit { t, point, normal: plane.normal, shape_index: 0, material_index: 0, is_inside: false })
}

/// Axis-aligned box: slab method, normal taken from whichever axis produced `tmin`.
pub fn raycast_aabox(ray: &Ray, aabox: &AaBox) -> Option<RaycastHit> {
    let origin = ray.origin();
    let recip = ray.reciprocal_direction();
    let sign = ray.sign();

    let axes = [
        (aabox.min.x, aabox.max.x, origin.x, recip.x, sign[0]),
        (aabox.min.y, aabox.max.y, origin.y, recip.y, sign[1]),
        (aabox.min.z, aabox.max.z, origin.z, recip.z, sign[2]),
    ];

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;
    let mut tmin_axis = 0usize;

    for (axis, (lo, hi, o, r, negative)) in axes.iter().enumerate() {
        let (near_bound, far_bound) = if *negative { (*hi, *lo) } else { (*lo, *hi) };
        let t0 = (near_bound - o) * r;
        let t1 = (far_bound - o) * r;
        if t0 > tmin {
            tmin = t0;
            tmin_axis = axis;
        }
        tmax = tmax.min(t1);
    }

    if tmin > tmax || tmax < 0.0 {
        return None;
    }

    let is_inside = tmin < 0.0;
    let t = if is_inside { tmax } else { tmin };
    let point = ray.at(t);

    let mut normal_vec = cgmath::Vector3::new(0.0, 0.0, 0.0);
    let component = match tmin_axis {
        0 => &mut normal_vec.x,
        1 => &mut normal_vec.y,
        _ => &mut normal_vec.z,
    };
    *component = if sign[tmin_axis] { 1.0 } else { -1.0 };
    let mut normal = Normal3::assume_normalized(normal_vec);
    if is_inside {
        normal = -normal;
    }

    Some(RaycastHit { t, point, normal, shape_index: 0, material_index: 0, is_inside })
}

/// Triangle: Möller–Trumbore. The hit normal is the barycentric blend of per-vertex
/// normals, not the flat face normal.
pub fn raycast_triangle(ray: &Ray, triangle: &Triangle) -> Option<RaycastHit> {
    const EPSILON: f32 = 1e-7;
    let [v0, v1, v2] = triangle.vertices;
    let dir = ray.direction().as_vec3();
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = ray.origin() - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t < 0.0 {
        return None;
    }
    let w = 1.0 - u - v;
    let point = ray.at(t);
    let normal = Normal3::new(
        triangle.normals[0].as_vec3() * w + triangle.normals[1].as_vec3() * u + triangle.normals[2].as_vec3() * v,
    );
    Some(RaycastHit { t, point, normal, shape_index: 0, material_index: 0, is_inside: false })
}

/// Barycentric interpolation of a triangle's per-vertex UVs at `point`, which must lie
/// on the triangle's plane (as produced by [`raycast_triangle`]). Used by the owning
/// array's shader to resolve texture coordinates without re-deriving `t`.
pub fn triangle_barycentric_uv(triangle: &Triangle, point: Point3) -> Point2 {
    let [v0, v1, v2] = triangle.vertices;
    let total_area = (v1 - v0).cross(v2 - v0).magnitude();
    let w0 = (v1 - point).cross(v2 - point).magnitude() / total_area;
    let w1 = (v2 - point).cross(v0 - point).magnitude() / total_area;
    let w2 = 1.0 - w0 - w1;
    Point2::new(
        triangle.uvs[0].x * w0 + triangle.uvs[1].x * w1 + triangle.uvs[2].x * w2,
        triangle.uvs[0].y * w0 + triangle.uvs[1].y * w1 + triangle.uvs[2].y * w2,
    )
}
