// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Vector, point, normal, ray, bounding box, and color primitives.

mod aabb;
mod color;
mod ray;
mod vector;

pub use aabb::Aabb;
pub use color::Rgb;
pub use ray::Ray;
pub use vector::{reflect, refract, Normal3, Point2, Point3, Vec2, Vec3};
