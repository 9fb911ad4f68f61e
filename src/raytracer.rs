// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The recursive radiance integrator: turns a primary ray into a color by walking
//! reflection, refraction, and direct-lighting contributions until they fall below
//! [`Options::contribution_threshold`] or [`Options::max_ray_depth`] is reached.

use crate::camera::Camera;
use crate::image::Image;
use crate::math::Ray;
use crate::math::{reflect, refract, Normal3, Rgb};
use crate::sampler::Sampler;
use crate::scene::Scene;
use crate::storage::{ResolvableHit, ResolvedHit};
use log::{debug, info};

/// Tunable thresholds and limits for [`Raytracer::trace`]. Defaults match a reasonable
/// first render: enough depth for a few bounces, small enough thresholds that they only
/// cut work nobody would notice missing.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Distance a secondary ray's origin is pushed along its direction before its own
    /// query, so it doesn't immediately re-hit the surface it left.
    pub padding_distance: f32,
    /// Recursion depth at which reflection/refraction stop contributing further bounces.
    pub max_ray_depth: u32,
    /// Below this, `compute_refraction_color` is skipped entirely.
    pub transparency_threshold: f32,
    /// Below this, `compute_reflection_color` is skipped entirely.
    pub reflectivity_threshold: f32,
    /// Below this, a surface is not treated as diffusive for shadow-ray lighting.
    pub diffuse_threshold: f32,
    /// Once the accumulated contribution's largest channel drops below this, recursion
    /// stops regardless of remaining depth budget.
    pub contribution_threshold: f32,
    /// Applied to the final color before 8-bit quantization.
    pub gamma: f32,
    /// When true, a ray already inside a volume that misses its locally-continued hit
    /// falls straight through as open space instead of re-querying the whole scene.
    /// Only safe for scenes with no nested or overlapping volumes.
    pub assume_no_volume_intersections: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            padding_distance: 0.002,
            max_ray_depth: 5,
            transparency_threshold: 0.01,
            reflectivity_threshold: 0.01,
            diffuse_threshold: 0.0,
            contribution_threshold: 0.01,
            gamma: 0.43,
            assume_no_volume_intersections: false,
        }
    }
}

fn is_transparent(hit: &ResolvedHit, options: &Options) -> bool {
    hit.transparency > options.transparency_threshold
}

fn is_reflective(hit: &ResolvedHit, options: &Options) -> bool {
    hit.reflectivity > options.reflectivity_threshold
}

fn is_diffusive(hit: &ResolvedHit, options: &Options) -> bool {
    hit.diffuse > options.diffuse_threshold
}

/// Schlick's approximation to the Fresnel reflectance, with the `n1`/`n2` swap for a ray
/// exiting a medium and an early return of full reflectance under total internal
/// reflection. Blended with the surface's own `reflectivity` at the end, since a
/// material's reflectivity and its Fresnel response both gate how much light bounces.
fn fresnel_reflect_amount(incident: Normal3, hit: &ResolvedHit, medium_refractive_index: f32) -> f32 {
    let (n1, n2) = if hit.is_inside { (medium_refractive_index, 1.0) } else { (1.0, medium_refractive_index) };
    let cos_i = (-hit.normal.dot(incident.as_vec3())).clamp(-1.0, 1.0);
    let eta = n1 / n2;
    let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
    if sin_t2 > 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    let cos_i_abs = cos_i.abs();
    let r_parallel = (n2 * cos_i_abs - n1 * cos_t) / (n2 * cos_i_abs + n1 * cos_t);
    let r_perpendicular = (n1 * cos_i_abs - n2 * cos_t) / (n1 * cos_i_abs + n2 * cos_t);
    let reflectance = (r_parallel * r_parallel + r_perpendicular * r_perpendicular) / 2.0;
    reflectance + (1.0 - reflectance) * hit.reflectivity
}

/// An integrator bound to one scene and one set of options; `trace` is re-entrant so a
/// single instance is reused across every primary ray of a capture.
pub struct Raytracer<'a> {
    scene: &'a Scene,
    options: Options,
}

impl<'a> Raytracer<'a> {
    pub fn new(scene: &'a Scene, options: Options) -> Raytracer<'a> {
        Raytracer { scene, options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Renders `camera` through `sampler`, gamma-correcting and quantizing every final
    /// pixel color to 8 bits.
    pub fn capture<S: Sampler>(&self, camera: &Camera, sampler: &S) -> Image {
        info!(
            "raytracer: capturing {}x{} image with sampler {}",
            camera.width(),
            camera.height(),
            std::any::type_name::<S>()
        );
        let colors = sampler.sample_image(camera, |ray| self.trace(ray, Rgb::WHITE, 0, None, false));
        let gamma = self.options.gamma;
        let pixels: Vec<[u8; 3]> = colors.iter().map(|c| c.powf(gamma).to_saturating_8bit()).collect();
        let image = Image::from_colors(camera.width(), camera.height(), &pixels);
        if crate::perf::enabled() {
            debug!("raytracer: capture finished, perf counters = {:?}", crate::perf::snapshot());
        }
        image
    }

    /// The core radiance integrator. `contribution` is the weight this ray's result will
    /// be multiplied by on its way back up the call tree, letting deep, low-weight
    /// branches stop early via [`Options::contribution_threshold`]. `prev_hit` is the hit
    /// this ray continues from, tried as a cheaper local re-test before falling back to a
    /// full scene query; `is_inside` marks a ray currently travelling through a volume,
    /// which changes both the Fresnel `n1`/`n2` assignment and which medium's absorption
    /// attenuates the result.
    pub fn trace(&self, ray: Ray, contribution: Rgb, depth: u32, prev_hit: Option<&ResolvableHit<'_>>, is_inside: bool) -> Rgb {
        let (rhit, is_inside) = match self.continue_or_requery(ray, prev_hit, is_inside) {
            Some(pair) => pair,
            None => {
                crate::perf::record_trace(depth, false);
                return self.miss_color(is_inside);
            }
        };
        crate::perf::record_trace(depth, true);

        let hit = rhit.resolve();
        let medium_refractive_index = hit.medium.as_ref().map(|m| m.refractive_index).unwrap_or(1.0);
        let reflect_amount = fresnel_reflect_amount(ray.direction(), &hit, medium_refractive_index);
        let unabsorbed = self.unabsorbed(&hit, is_inside);

        let refraction_color = self.compute_refraction_color(ray, &hit, &rhit, contribution, depth, is_inside, reflect_amount);
        let reflection_color = self.compute_reflection_color(ray, &hit, &rhit, contribution, depth, is_inside, reflect_amount);
        let diffusion_color = self.compute_diffusion_color(&hit, contribution, unabsorbed);

        let refraction_contribution = if is_transparent(&hit, &self.options) { 1.0 - reflect_amount } else { 0.0 };
        let reflection_contribution = if is_reflective(&hit, &self.options) { reflect_amount } else { 0.0 };

        let color = self.combine(&hit, refraction_color * refraction_contribution, reflection_color * reflection_contribution, diffusion_color);
        color * unabsorbed
    }

    /// Attempts a local re-test of `prev_hit`'s shape before falling back to a full scene
    /// query. Clears `is_inside` whenever the local continuation isn't taken, since
    /// leaving the previous volume without hitting anything new puts the ray back in
    /// open space.
    fn continue_or_requery<'b>(
        &'b self,
        ray: Ray,
        prev_hit: Option<&ResolvableHit<'b>>,
        is_inside: bool,
    ) -> Option<(ResolvableHit<'b>, bool)> {
        if is_inside && self.options.assume_no_volume_intersections {
            if let Some(hit) = prev_hit.and_then(|h| h.next(&ray)) {
                return Some((hit, true));
            }
            return self.scene.query_nearest(&ray).map(|hit| (hit, false));
        }
        self.scene.query_nearest(&ray).map(|hit| (hit, is_inside))
    }

    fn miss_color(&self, is_inside: bool) -> Rgb {
        let background = self.scene.background_color();
        if is_inside {
            if let Some(medium) = self.scene.ambient_medium() {
                return background * Rgb::beer_lambert(medium.absorption, Self::missed_ray_distance());
            }
        }
        background
    }

    /// There is no far scene boundary to measure against; a miss inside an ambient
    /// medium attenuates over a nominal large distance rather than `infinity`, which
    /// would always fully absorb regardless of how weak the medium's absorption is.
    fn missed_ray_distance() -> f32 {
        1000.0
    }

    fn unabsorbed(&self, hit: &ResolvedHit, is_inside: bool) -> Rgb {
        if is_inside {
            match &hit.medium {
                Some(medium) => Rgb::beer_lambert(medium.absorption, hit.t),
                None => Rgb::WHITE,
            }
        } else if let Some(medium) = self.scene.ambient_medium() {
            Rgb::beer_lambert(medium.absorption, hit.t)
        } else {
            Rgb::WHITE
        }
    }

    fn compute_refraction_color(
        &self,
        ray: Ray,
        hit: &ResolvedHit,
        rhit: &ResolvableHit<'_>,
        contribution: Rgb,
        depth: u32,
        is_inside: bool,
        reflect_amount: f32,
    ) -> Rgb {
        if !is_transparent(hit, &self.options) || depth >= self.options.max_ray_depth {
            return Rgb::BLACK;
        }
        let next_contribution = contribution * (1.0 - reflect_amount);
        if next_contribution.max_channel() < self.options.contribution_threshold {
            return Rgb::BLACK;
        }
        let medium_refractive_index = hit.medium.as_ref().map(|m| m.refractive_index).unwrap_or(1.0);
        let (n1, n2) = if is_inside { (medium_refractive_index, 1.0) } else { (1.0, medium_refractive_index) };
        let refracted = match refract(ray.direction().as_vec3(), hit.normal, n1 / n2) {
            Some(direction) => Normal3::new(direction),
            None => return Rgb::BLACK,
        };
        let next_ray = Ray::offset(hit.point, refracted, self.options.padding_distance);
        self.trace(next_ray, next_contribution, depth + 1, Some(rhit), !is_inside)
    }

    fn compute_reflection_color(
        &self,
        ray: Ray,
        hit: &ResolvedHit,
        rhit: &ResolvableHit<'_>,
        contribution: Rgb,
        depth: u32,
        is_inside: bool,
        reflect_amount: f32,
    ) -> Rgb {
        if !is_reflective(hit, &self.options) || depth >= self.options.max_ray_depth {
            return Rgb::BLACK;
        }
        let next_contribution = contribution * reflect_amount;
        if next_contribution.max_channel() < self.options.contribution_threshold {
            return Rgb::BLACK;
        }
        let reflected = Normal3::new(reflect(ray.direction().as_vec3(), hit.normal));
        let next_ray = Ray::offset(hit.point, reflected, self.options.padding_distance);
        self.trace(next_ray, next_contribution, depth + 1, Some(rhit), is_inside)
    }

    /// Direct lighting via one shadow ray per scene light. A light is unoccluded when
    /// the shadow ray's nearest hit is the light's own object; anything else counts as
    /// shadowed.
    fn compute_diffusion_color(&self, hit: &ResolvedHit, contribution: Rgb, unabsorbed: Rgb) -> Rgb {
        if (!is_diffusive(hit, &self.options) && !hit.is_inside) || contribution.max_channel() < self.options.contribution_threshold {
            return Rgb::BLACK;
        }
        let mut sum = Rgb::BLACK;
        for light in self.scene.lights() {
            let shadow_ray = Ray::between(hit.point, light.center());
            let Some(shadow_hit) = self.scene.query_nearest(&shadow_ray) else {
                continue;
            };
            if shadow_hit.object_id() != light.id() {
                continue;
            }
            let light_hit = shadow_hit.resolve();
            let alignment = hit.normal.dot(shadow_ray.direction().as_vec3()).max(0.0);
            sum += light_hit.emission_color * alignment * unabsorbed;
        }
        sum * hit.diffuse
    }

    fn combine(&self, hit: &ResolvedHit, refraction_color: Rgb, reflection_color: Rgb, diffusion_color: Rgb) -> Rgb {
        hit.surface_color * (refraction_color + reflection_color + diffusion_color) + hit.emission_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::SurfaceMaterial;
    use crate::math::Point3;
    use crate::sampler::SingleSample;
    use crate::scene::{SceneBuilder, StorageKind};
    use crate::sceneobject::SceneObject;
    use crate::shape::{Plane, Sphere};
    use cgmath::{point3, vec3};
    use std::sync::Arc;

    fn camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)), Normal3::new(vec3(0.0, 1.0, 0.0)), 16, 16, 45.0_f32.to_radians())
    }

    #[test]
    fn empty_scene_renders_pure_background() {
        let scene = SceneBuilder::new().build(StorageKind::Blob);
        let raytracer = Raytracer::new(&scene, Options::default());
        let image = raytracer.capture(&camera(), &SingleSample);
        assert_eq!(image.pixel(8, 8), [0, 0, 0, 255]);
    }

    #[test]
    fn background_survives_gamma_one_unchanged() {
        let mut builder = SceneBuilder::new();
        builder.set_background_color(Rgb::new(0.2, 0.4, 0.6));
        let scene = builder.build(StorageKind::Blob);
        let mut options = Options::default();
        options.gamma = 1.0;
        let raytracer = Raytracer::new(&scene, options);
        let image = raytracer.capture(&camera(), &SingleSample);
        let [r, g, b] = Rgb::new(0.2, 0.4, 0.6).to_saturating_8bit();
        assert_eq!(image.pixel(8, 8), [r, g, b, 255]);
    }

    fn emissive_material() -> Arc<SurfaceMaterial> {
        Arc::new(SurfaceMaterial {
            surface_color: Rgb::ZERO,
            emission_color: Rgb::WHITE,
            transparency: 0.0,
            reflectivity: 0.0,
            diffuse: 1.0,
            texture: None,
        })
    }

    fn diffuse_material() -> Arc<SurfaceMaterial> {
        Arc::new(SurfaceMaterial {
            surface_color: Rgb::new(1.0, 0.0, 0.0),
            emission_color: Rgb::ZERO,
            transparency: 0.0,
            reflectivity: 0.0,
            diffuse: 1.0,
            texture: None,
        })
    }

    #[test]
    fn emissive_surface_reports_its_own_color_unshadowed() {
        let mut builder = SceneBuilder::new();
        builder.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 0.0, -5.0), 1.0), vec![emissive_material()], None));
        let scene = builder.build(StorageKind::Blob);
        let raytracer = Raytracer::new(&scene, Options::default());
        let ray = Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)));
        let color = raytracer.trace(ray, Rgb::WHITE, 0, None, false);
        assert!(color.max_channel() > 0.5);
    }

    #[test]
    fn diffuse_plane_lit_by_a_visible_light_is_brighter_than_unlit() {
        // A plane facing the camera (+z normal) at z = -5, lit by a sphere sitting
        // above and in front of it so the shadow ray from the plane toward the light
        // points into the plane's own front half-space — `raycast_plane` rejects a ray
        // whose direction doesn't oppose the normal, so the plane never shadows itself.
        let plane = Plane::new(Normal3::new(vec3(0.0, 0.0, 1.0)), -5.0);
        let ray = Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)));

        let mut lit_builder = SceneBuilder::new();
        lit_builder.add_plane(SceneObject::new(plane, vec![diffuse_material()], None));
        lit_builder.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 2.0, -2.0), 0.3), vec![emissive_material()], None));
        let lit_scene = lit_builder.build(StorageKind::Blob);
        let lit_raytracer = Raytracer::new(&lit_scene, Options::default());
        let lit = lit_raytracer.trace(ray, Rgb::WHITE, 0, None, false);

        let mut dark_builder = SceneBuilder::new();
        dark_builder.add_plane(SceneObject::new(plane, vec![diffuse_material()], None));
        let dark_scene = dark_builder.build(StorageKind::Blob);
        let dark_raytracer = Raytracer::new(&dark_scene, Options::default());
        let dark = dark_raytracer.trace(ray, Rgb::WHITE, 0, None, false);

        assert!(lit.max_channel() > dark.max_channel(), "lit = {:?}, dark = {:?}", lit, dark);
    }

    #[test]
    fn recursion_stops_at_max_ray_depth() {
        let mirror = Arc::new(SurfaceMaterial {
            surface_color: Rgb::WHITE,
            emission_color: Rgb::ZERO,
            transparency: 0.0,
            reflectivity: 1.0,
            diffuse: 0.0,
            texture: None,
        });
        let mut builder = SceneBuilder::new();
        builder.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 0.0, -5.0), 1.0), vec![mirror], None));
        let scene = builder.build(StorageKind::Blob);
        let mut options = Options::default();
        options.max_ray_depth = 0;
        let raytracer = Raytracer::new(&scene, options);
        let ray = Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)));
        let color = raytracer.trace(ray, Rgb::WHITE, 0, None, false);
        assert_eq!(color, Rgb::BLACK);
    }

    #[test]
    fn mirror_sphere_reflects_toward_a_visible_light() {
        let mirror = Arc::new(SurfaceMaterial {
            surface_color: Rgb::WHITE,
            emission_color: Rgb::ZERO,
            transparency: 0.0,
            reflectivity: 1.0,
            diffuse: 0.0,
            texture: None,
        });
        let mut builder = SceneBuilder::new();
        builder.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 0.0, -5.0), 1.0), vec![mirror], None));
        let scene = builder.build(StorageKind::Blob);
        let raytracer = Raytracer::new(&scene, Options::default());
        let ray = Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)));
        // A mirror facing the camera dead-on reflects straight back, so the color should
        // just be the empty background it sees behind the camera's vantage point.
        let color = raytracer.trace(ray, Rgb::WHITE, 0, None, false);
        assert_eq!(color, scene.background_color());
    }
}
