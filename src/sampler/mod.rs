// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Multisamplers: strategies for taking one or more samples per pixel and combining
//! them, all driven through the same `sample_pixel`/`sample_image` contract so the
//! raytracer's capture loop doesn't need to know which one it's using.

use crate::camera::{Camera, Viewport};
use crate::math::{Point2, Ray, Rgb};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Parallelizes `f` over every pixel in `width x height`, using `rayon` when the
/// `rayon` feature is enabled and a sequential fallback otherwise. Mirrors the
/// dual-path pattern used for the image capture loop itself.
fn for_each_pixel<T: Send>(width: u32, height: u32, f: impl Fn(u32, u32) -> T + Sync) -> Vec<T> {
    let total = width as u64 * height as u64;
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        (0..total).into_par_iter().map(|i| f((i % width as u64) as u32, (i / width as u64) as u32)).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        (0..total).map(|i| f((i % width as u64) as u32, (i / width as u64) as u32)).collect()
    }
}

/// A strategy for combining one or more rays per pixel into a single color.
///
/// `sample_pixel` returns both the blended color and the number of primary rays that
/// went into it, since [`Adaptive`] needs the count to weight its own blend.
pub trait Sampler: Sync {
    fn sample_pixel<F>(&self, viewport: &Viewport, x: u32, y: u32, trace: &F) -> (Rgb, usize)
    where
        F: Fn(Ray) -> Rgb + Sync;

    fn sample_image<F>(&self, camera: &Camera, trace: F) -> Vec<Rgb>
    where
        F: Fn(Ray) -> Rgb + Sync + Send,
    {
        let viewport = camera.viewport();
        for_each_pixel(viewport.width(), viewport.height(), |x, y| self.sample_pixel(&viewport, x, y, &trace).0)
    }
}

/// One ray at the pixel center.
pub struct SingleSample;

impl Sampler for SingleSample {
    fn sample_pixel<F>(&self, viewport: &Viewport, x: u32, y: u32, trace: &F) -> (Rgb, usize)
    where
        F: Fn(Ray) -> Rgb + Sync,
    {
        let ray = viewport.ray_at(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
        (trace(ray), 1)
    }
}

/// `order * order` rays per pixel on a regular sub-pixel grid, equally weighted.
pub struct UniformGrid {
    pub order: u32,
}

impl Sampler for UniformGrid {
    fn sample_pixel<F>(&self, viewport: &Viewport, x: u32, y: u32, trace: &F) -> (Rgb, usize)
    where
        F: Fn(Ray) -> Rgb + Sync,
    {
        let n = self.order.max(1);
        let weight = 1.0 / (n * n) as f32;
        let mut sum = Rgb::ZERO;
        for j in 0..n {
            for i in 0..n {
                let sub = Point2::new((i as f32 + 0.5) / n as f32, (j as f32 + 0.5) / n as f32);
                let coords = Point2::new(x as f32 + sub.x, y as f32 + sub.y);
                sum += trace(viewport.ray_at(coords)) * weight;
            }
        }
        (sum, (n * n) as usize)
    }
}

/// `order * order` sub-pixel cells, each offset by a pseudo-random value drawn from a
/// pre-generated table of `num_offsets` entries and indexed by a hash mixing pixel and
/// sub-cell coordinates — deterministic given the same seed and image size. `x` and `y`
/// offsets are drawn from the same table through two independent hash families.
pub struct Jittered {
    pub order: u32,
    pub num_offsets: usize,
    pub seed: u64,
}

impl Jittered {
    fn offset_table(&self, scale: f32) -> Vec<f32> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        (0..self.num_offsets.max(1)).map(|_| rng.gen_range(-0.5 * scale..0.5 * scale)).collect()
    }
}

/// A splitmix64-style bit mix, used to turn a combined pixel/sub-cell index into a
/// well-distributed table index.
fn mix_index(mut idx: u64) -> u64 {
    idx ^= idx >> 30;
    idx = idx.wrapping_mul(0xbf58476d1ce4e5b9);
    idx ^= idx >> 27;
    idx = idx.wrapping_mul(0x94d049bb133111eb);
    idx ^= idx >> 31;
    idx
}

fn combined_cell_index(x: u32, y: u32, i: u32, j: u32, n: u32, width: u32) -> u64 {
    let pixel = y as u64 * width as u64 + x as u64;
    let cell = j as u64 * n as u64 + i as u64;
    pixel * (n as u64 * n as u64) + cell
}

impl Sampler for Jittered {
    fn sample_pixel<F>(&self, viewport: &Viewport, x: u32, y: u32, trace: &F) -> (Rgb, usize)
    where
        F: Fn(Ray) -> Rgb + Sync,
    {
        let n = self.order.max(1);
        let scale = 1.0 / n as f32;
        let offsets = self.offset_table(scale);
        let weight = 1.0 / (n * n) as f32;
        let width = viewport.width();
        let mut sum = Rgb::ZERO;
        for j in 0..n {
            for i in 0..n {
                let idx = combined_cell_index(x, y, i, j, n, width);
                let ox = offsets[(mix_index(idx) as usize) % offsets.len()];
                let oy = offsets[(mix_index(!idx) as usize) % offsets.len()];
                let sub_x = (i as f32 + 0.5) / n as f32 + ox;
                let sub_y = (j as f32 + 0.5) / n as f32 + oy;
                let coords = Point2::new(x as f32 + sub_x, y as f32 + sub_y);
                sum += trace(viewport.ray_at(coords)) * weight;
            }
        }
        (sum, (n * n) as usize)
    }
}

/// Five samples per pixel in the "5" face of a die: four corners shared with adjacent
/// pixels, one unique center. [`Sampler::sample_image`] caches the `(W+1) x (H+1)`
/// corner grid so adjacent pixels don't retrace shared corners; [`Sampler::sample_pixel`]
/// (used by [`Adaptive`] for single-pixel re-sampling) recomputes them directly, which
/// is behaviorally identical since `trace` is a deterministic function of the ray.
pub struct Quincunx;

impl Sampler for Quincunx {
    fn sample_pixel<F>(&self, viewport: &Viewport, x: u32, y: u32, trace: &F) -> (Rgb, usize)
    where
        F: Fn(Ray) -> Rgb + Sync,
    {
        let center = trace(viewport.ray_at(Point2::new(x as f32 + 0.5, y as f32 + 0.5)));
        let mut sum = center;
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            sum += trace(viewport.ray_at(Point2::new((x + dx) as f32, (y + dy) as f32)));
        }
        (sum * 0.2, 5)
    }

    fn sample_image<F>(&self, camera: &Camera, trace: F) -> Vec<Rgb>
    where
        F: Fn(Ray) -> Rgb + Sync + Send,
    {
        let viewport = camera.viewport();
        let width = viewport.width();
        let height = viewport.height();
        let corners = for_each_pixel(width + 1, height + 1, |x, y| trace(viewport.ray_at(Point2::new(x as f32, y as f32))));
        let corner_at = |x: u32, y: u32| corners[(y * (width + 1) + x) as usize];
        for_each_pixel(width, height, |x, y| {
            let center = trace(viewport.ray_at(Point2::new(x as f32 + 0.5, y as f32 + 0.5)));
            let sum = center + corner_at(x, y) + corner_at(x + 1, y) + corner_at(x, y + 1) + corner_at(x + 1, y + 1);
            sum * 0.2
        })
    }
}

/// Wraps another sampler: first pass takes one sample per pixel; interior pixels whose
/// L1 color distance to any of their four axis-aligned neighbors exceeds `threshold`
/// are re-sampled via the wrapped sampler and blended with the original sample.
/// Boundary pixels are never re-sampled.
pub struct Adaptive<S> {
    pub inner: S,
    pub threshold: f32,
}

fn l1_distance(a: Rgb, b: Rgb) -> f32 {
    (a.red() - b.red()).abs() + (a.green() - b.green()).abs() + (a.blue() - b.blue()).abs()
}

impl<S: Sampler> Sampler for Adaptive<S> {
    fn sample_pixel<F>(&self, viewport: &Viewport, x: u32, y: u32, trace: &F) -> (Rgb, usize)
    where
        F: Fn(Ray) -> Rgb + Sync,
    {
        self.inner.sample_pixel(viewport, x, y, trace)
    }

    fn sample_image<F>(&self, camera: &Camera, trace: F) -> Vec<Rgb>
    where
        F: Fn(Ray) -> Rgb + Sync + Send,
    {
        let viewport = camera.viewport();
        let width = viewport.width();
        let height = viewport.height();
        let base = SingleSample.sample_image(camera, &trace);
        if width < 3 || height < 3 {
            return base;
        }
        let idx = |x: u32, y: u32| (y * width + x) as usize;

        for_each_pixel(width, height, |x, y| {
            if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                return base[idx(x, y)];
            }
            let here = base[idx(x, y)];
            let is_aliased = [base[idx(x - 1, y)], base[idx(x + 1, y)], base[idx(x, y - 1)], base[idx(x, y + 1)]]
                .iter()
                .any(|neighbor| l1_distance(here, *neighbor) > self.threshold);
            if !is_aliased {
                return here;
            }
            let (resampled, count) = self.inner.sample_pixel(&viewport, x, y, &trace);
            (resampled * count as f32 + here) * (1.0 / (count as f32 + 1.0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Normal3, Point3};
    use cgmath::vec3;

    fn test_camera() -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 0.0),
            Normal3::new(vec3(0.0, 0.0, -1.0)),
            Normal3::new(vec3(0.0, 1.0, 0.0)),
            4,
            4,
            45.0_f32.to_radians(),
        )
    }

    #[test]
    fn uniform_grid_order_one_is_single_center_sample() {
        let camera = test_camera();
        let viewport = camera.viewport();
        let center_coords = Point2::new(2.5, 2.5);
        let (color, count) = UniformGrid { order: 1 }.sample_pixel(&viewport, 2, 2, &|ray| {
            assert!((ray.origin() - Point3::new(0.0, 0.0, 0.0)).x.abs() < 1e-6);
            let expected = viewport.ray_at(center_coords);
            assert!((ray.direction().as_vec3() - expected.direction().as_vec3()).x.abs() < 1e-4);
            Rgb::WHITE
        });
        assert_eq!(count, 1);
        assert_eq!(color, Rgb::WHITE);
    }

    #[test]
    fn jittered_sampler_is_deterministic_given_same_seed() {
        let camera = test_camera();
        let sampler = Jittered { order: 2, num_offsets: 64, seed: 42 };
        let trace = |ray: Ray| Rgb::new(ray.direction().as_vec3().x.abs(), 0.0, 0.0);
        let first = sampler.sample_image(&camera, trace);
        let second = sampler.sample_image(&camera, trace);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn adaptive_with_infinite_threshold_matches_single_sample() {
        let camera = test_camera();
        let trace = |ray: Ray| Rgb::new(ray.direction().as_vec3().x, 0.0, 0.0);
        let base = SingleSample.sample_image(&camera, trace);
        let adaptive = Adaptive { inner: UniformGrid { order: 4 }, threshold: f32::INFINITY };
        let result = adaptive.sample_image(&camera, trace);
        assert_eq!(base, result);
    }
}
