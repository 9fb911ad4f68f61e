// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

use cgmath::{InnerSpace, Point2 as CgPoint2, Point3 as CgPoint3, Vector2 as CgVector2, Vector3 as CgVector3};
use std::ops::{Add, Mul, Neg, Sub};

/// A free vector in three dimensions. Linear: vectors add to vectors.
pub type Vec3 = CgVector3<f32>;

/// A two-dimensional free vector, used for texture coordinates and sub-pixel offsets.
pub type Vec2 = CgVector2<f32>;

/// An affine point in three dimensions. Points don't add; `p1 - p2` yields a [`Vec3`].
pub type Point3 = CgPoint3<f32>;

/// An affine point in two dimensions (pixel / sub-pixel coordinates).
pub type Point2 = CgPoint2<f32>;

/// A vector known to be unit-length, within floating point tolerance.
///
/// Construction from an arbitrary vector normalizes; [`Normal3::assume_normalized`] skips
/// that work for vectors a caller already knows are unit length (e.g. a cross product of
/// two orthogonal unit vectors divided by its own length, or a shape's precomputed normal).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normal3(Vec3);

impl Normal3 {
    /// Normalizes `v`. Panics if `v` is the zero vector (there is no normal to produce).
    pub fn new(v: Vec3) -> Self {
        let len2 = v.magnitude2();
        debug_assert!(len2.is_finite() && len2 > 0.0, "cannot normalize a zero-length vector");
        Normal3(v / len2.sqrt())
    }

    /// Wraps `v` without normalizing. Caller asserts `v` is already unit-length; violating
    /// this is a logic error but not checked in release builds (matches the ray raycast
    /// kernels, which never renormalize a flipped normal).
    pub fn assume_normalized(v: Vec3) -> Self {
        debug_assert!((v.magnitude2() - 1.0).abs() < 1e-3, "assume_normalized given a non-unit vector");
        Normal3(v)
    }

    pub fn as_vec3(self) -> Vec3 {
        self.0
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.0.dot(other)
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        self.0.cross(other)
    }
}

impl Neg for Normal3 {
    type Output = Normal3;
    fn neg(self) -> Normal3 {
        Normal3(-self.0)
    }
}

impl From<Normal3> for Vec3 {
    fn from(n: Normal3) -> Vec3 {
        n.0
    }
}

impl Add<Vec3> for Normal3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        self.0 + rhs
    }
}

impl Sub<Vec3> for Normal3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        self.0 - rhs
    }
}

impl Mul<f32> for Normal3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        self.0 * rhs
    }
}

/// The specular reflection of `incident` about `normal`; `incident` points toward the
/// surface. Satisfies `reflection(v, n) . n == -(v . n)`.
pub fn reflect(incident: Vec3, normal: Normal3) -> Vec3 {
    incident - normal * (2.0 * normal.dot(incident))
}

/// Refracts `incident` (pointing toward the surface) through a boundary with relative
/// index of refraction `eta = n1 / n2`, given the outward `normal` facing the incident
/// side. Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Normal3, eta: f32) -> Option<Vec3> {
    let cos_i = (-normal.dot(incident)).clamp(-1.0, 1.0);
    let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
    if sin_t2 > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    Some(incident * eta + normal * (eta * cos_i - cos_t))
}
