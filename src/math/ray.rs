// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

use super::vector::{Normal3, Point3, Vec3};

/// Below this magnitude a direction component's reciprocal is clamped away from infinity.
const RECIPROCAL_EPSILON: f32 = 1e-5;

/// An immutable half-line: an origin point and a unit direction, plus the precomputed
/// reciprocal direction and per-axis sign mask the box-slab raycast needs.
///
/// Invariant: `direction` is unit-length; `reciprocal` and `sign` are always derived from
/// `direction`, never set independently.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    origin: Point3,
    direction: Normal3,
    reciprocal: Vec3,
    /// `true` where the corresponding direction component is negative — used by the box
    /// slab test to decide whether `min`/`max` swap for that axis.
    sign: [bool; 3],
}

impl Ray {
    pub fn new(origin: Point3, direction: Normal3) -> Ray {
        let d = direction.as_vec3();
        let reciprocal = Vec3::new(reciprocal_clamped(d.x), reciprocal_clamped(d.y), reciprocal_clamped(d.z));
        let sign = [d.x < 0.0, d.y < 0.0, d.z < 0.0];
        Ray { origin, direction, reciprocal, sign }
    }

    /// A shadow/continuation ray from `from` toward `to`; direction is `to - from`
    /// normalized. Used by the diffuse-lighting step to build the ray toward a light.
    pub fn between(from: Point3, to: Point3) -> Ray {
        Ray::new(from, Normal3::new(to - from))
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn direction(&self) -> Normal3 {
        self.direction
    }

    pub fn reciprocal_direction(&self) -> Vec3 {
        self.reciprocal
    }

    pub fn sign(&self) -> [bool; 3] {
        self.sign
    }

    pub fn at(&self, t: f32) -> Point3 {
        self.origin + self.direction.as_vec3() * t
    }

    /// Builds a secondary ray starting `padding` units past `point` along `direction`, to
    /// avoid re-intersecting the surface the secondary ray leaves from.
    pub fn offset(point: Point3, direction: Normal3, padding: f32) -> Ray {
        Ray::new(point + direction.as_vec3() * padding, direction)
    }
}

fn reciprocal_clamped(component: f32) -> f32 {
    let magnitude = component.abs().max(RECIPROCAL_EPSILON);
    magnitude.copysign(component).recip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{point3, vec3};

    #[test]
    fn reciprocal_direction_never_infinite() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 1.0, 0.0)));
        assert!(ray.reciprocal_direction().x.is_finite());
        assert!(ray.reciprocal_direction().z.is_finite());
    }

    #[test]
    fn sign_mask_matches_direction() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Normal3::new(vec3(-1.0, 1.0, -0.1)));
        assert_eq!(ray.sign(), [true, false, true]);
    }

    #[test]
    fn between_points_toward_target() {
        let ray = Ray::between(point3(0.0, 0.0, 0.0), point3(0.0, 0.0, -5.0));
        assert!((ray.direction().as_vec3() - vec3(0.0, 0.0, -1.0)).x.abs() < 1e-6);
    }
}
