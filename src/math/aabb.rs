// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

use super::ray::Ray;
use super::vector::{Point3, Vec3};

/// An axis-aligned bounding box. Invariant: `min <= max` componentwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: Point3,
    max: Point3,
}

impl Aabb {
    pub fn new(min: Point3, max: Point3) -> Aabb {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Aabb { min, max }
    }

    /// An AABB containing no points; the identity for [`Aabb::union`]/[`Aabb::extend`].
    pub fn empty() -> Aabb {
        Aabb {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn min(&self) -> Point3 {
        self.min
    }

    pub fn max(&self) -> Point3 {
        self.max
    }

    pub fn center(&self) -> Point3 {
        self.min + (self.max - self.min) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// The axis (0=x, 1=y, 2=z) along which this box is largest.
    pub fn biggest_extent_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    pub fn extend_with_point(&mut self, p: Point3) {
        self.min = Point3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn extend_with_box(&mut self, other: &Aabb) {
        self.extend_with_point(other.min);
        self.extend_with_point(other.max);
    }

    pub fn union(a: &Aabb, b: &Aabb) -> Aabb {
        let mut result = *a;
        result.extend_with_box(b);
        result
    }

    fn contains_point(&self, p: Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Bounding-volume raycast: the near `t` only, or `None` on a miss or a hit no closer
    /// than `t_max`. Short-circuits to `t = 0` when the ray origin is already inside.
    pub fn raycast_bv(&self, ray: &Ray, t_max: f32) -> Option<f32> {
        if self.contains_point(ray.origin()) {
            return Some(0.0);
        }

        let recip = ray.reciprocal_direction();
        let sign = ray.sign();
        let origin = ray.origin();

        let (mut tmin, mut tmax) = slab(origin.x, recip.x, sign[0], self.min.x, self.max.x);
        let (tymin, tymax) = slab(origin.y, recip.y, sign[1], self.min.y, self.max.y);
        if tmin > tymax || tymin > tmax {
            return None;
        }
        tmin = tmin.max(tymin);
        tmax = tmax.min(tymax);

        let (tzmin, tzmax) = slab(origin.z, recip.z, sign[2], self.min.z, self.max.z);
        if tmin > tzmax || tzmin > tmax {
            return None;
        }
        tmin = tmin.max(tzmin);
        tmax = tmax.min(tzmax);

        if tmax < 0.0 {
            return None;
        }
        let t = if tmin < 0.0 { tmax } else { tmin };
        if t >= t_max {
            None
        } else {
            Some(t)
        }
    }
}

/// One axis of the slab test: returns `(near, far)` for that axis, with `min`/`max`
/// swapped when the ray's direction component on this axis is negative.
fn slab(origin: f32, recip: f32, negative: bool, lo: f32, hi: f32) -> (f32, f32) {
    let (near_bound, far_bound) = if negative { (hi, lo) } else { (lo, hi) };
    ((near_bound - origin) * recip, (far_bound - origin) * recip)
}
