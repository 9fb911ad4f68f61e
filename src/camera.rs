// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Camera position/orientation and the viewport it derives, which turns pixel
//! coordinates into primary rays.

use crate::math::{Normal3, Point2, Point3, Ray, Vec3};
use cgmath::InnerSpace;

/// Viewport distance from the camera along its direction is fixed at 1; FOV controls
/// viewport size instead of distance.
const VIEWPORT_DISTANCE: f32 = 1.0;

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    position: Point3,
    direction: Normal3,
    up: Normal3,
    width: u32,
    height: u32,
    /// Full field of view, radians.
    fov: f32,
}

impl Camera {
    pub fn new(position: Point3, direction: Normal3, up: Normal3, width: u32, height: u32, fov: f32) -> Camera {
        Camera { position, direction, up, width, height, fov }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn viewport(&self) -> Viewport {
        let right = Normal3::new(self.direction.cross(self.up.as_vec3()));
        let down = Normal3::new(-right.cross(self.direction.as_vec3()));

        let height = 2.0 * VIEWPORT_DISTANCE * (self.fov / 2.0).tan();
        let width = height * self.aspect_ratio();

        let center = self.position + self.direction.as_vec3() * VIEWPORT_DISTANCE;
        let pixel_width = width / self.width as f32;
        let pixel_height = height / self.height as f32;

        let top_left = center - right * (width / 2.0) - down * (height / 2.0);

        Viewport {
            origin: self.position,
            top_left,
            right,
            down,
            pixel_width,
            pixel_height,
            width: self.width,
            height: self.height,
        }
    }
}

/// A rectangle at distance 1 from the camera, from which primary rays are generated.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    origin: Point3,
    top_left: Point3,
    right: Normal3,
    down: Normal3,
    pixel_width: f32,
    pixel_height: f32,
    width: u32,
    height: u32,
}

impl Viewport {
    /// The point on the viewport plane for sub-pixel coordinates `(x, y)` — not
    /// necessarily integers; a sampler may ask for e.g. `(3.5, 3.5)` for a pixel center
    /// or `(3.25, 3.7)` for a jittered sub-sample.
    pub fn at(&self, coords: Point2) -> Point3 {
        self.top_left + self.right * (coords.x * self.pixel_width) + self.down * (coords.y * self.pixel_height)
    }

    pub fn direction_at(&self, coords: Point2) -> Normal3 {
        Normal3::new(self.at(coords) - self.origin)
    }

    pub fn ray_at(&self, coords: Point2) -> Ray {
        Ray::new(self.origin, self.direction_at(coords))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
