//! An on-axis ray through a glass sphere passes straight through undeflected (normal
//! incidence bends nothing) and picks up the emissive color of whatever sits directly
//! behind it, attenuated only by the Fresnel reflectance lost at each of the two
//! surfaces it crosses. An otherwise-identical opaque, unlit sphere shows nothing.

use cgmath::{point3, vec3};
use raytracer::material::{MediumMaterial, SurfaceMaterial};
use raytracer::math::{Normal3, Ray, Rgb};
use raytracer::raytracer::{Options, Raytracer};
use raytracer::scene::{SceneBuilder, StorageKind};
use raytracer::sceneobject::SceneObject;
use raytracer::shape::{Plane, Sphere};
use std::sync::Arc;

fn backdrop_emission() -> Rgb {
    Rgb::new(0.2, 0.8, 0.2)
}

fn glass_medium() -> Arc<MediumMaterial> {
    Arc::new(MediumMaterial { absorption: Rgb::ZERO, refractive_index: 1.5 })
}

fn glass_surface() -> Arc<SurfaceMaterial> {
    Arc::new(SurfaceMaterial {
        surface_color: Rgb::WHITE,
        emission_color: Rgb::ZERO,
        transparency: 1.0,
        reflectivity: 0.0,
        diffuse: 0.0,
        texture: None,
    })
}

fn opaque_surface() -> Arc<SurfaceMaterial> {
    Arc::new(SurfaceMaterial {
        surface_color: Rgb::WHITE,
        emission_color: Rgb::ZERO,
        transparency: 0.0,
        reflectivity: 0.0,
        diffuse: 1.0,
        texture: None,
    })
}

fn backdrop_plane() -> SceneObject<Plane> {
    let emissive = Arc::new(SurfaceMaterial {
        surface_color: Rgb::ZERO,
        emission_color: backdrop_emission(),
        transparency: 0.0,
        reflectivity: 0.0,
        diffuse: 0.0,
        texture: None,
    });
    SceneObject::new(Plane::new(Normal3::new(vec3(0.0, 0.0, 1.0)), -10.0), vec![emissive], None)
}

fn camera_ray() -> Ray {
    Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)))
}

#[test]
fn glass_sphere_shows_an_attenuated_view_of_what_is_behind_it() {
    let mut builder = SceneBuilder::new();
    builder.add_plane(backdrop_plane());
    builder.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 0.0, -3.0), 1.0), vec![glass_surface()], Some(glass_medium())));
    let scene = builder.build(StorageKind::Blob);
    let raytracer = Raytracer::new(&scene, Options::default());

    let color = raytracer.trace(camera_ray(), Rgb::WHITE, 0, None, false);

    // Two normal-incidence Fresnel interfaces at n = 1.5 each pass ~96% of the light
    // (reflectance = ((1.5-1)/(1.5+1))^2 = 0.04), so the backdrop's green comes through
    // scaled by roughly 0.96^2 rather than full strength or fully blocked.
    let expected = backdrop_emission() * 0.96 * 0.96;
    assert!((color.red() - expected.red()).abs() < 0.01, "color = {:?}, expected ~= {:?}", color, expected);
    assert!((color.green() - expected.green()).abs() < 0.01, "color = {:?}, expected ~= {:?}", color, expected);
    assert!((color.blue() - expected.blue()).abs() < 0.01, "color = {:?}, expected ~= {:?}", color, expected);
    assert!(color.green() > color.red() && color.green() > color.blue(), "expected a green-dominant color, got {:?}", color);
}

#[test]
fn opaque_unlit_sphere_shows_nothing() {
    let mut builder = SceneBuilder::new();
    builder.add_plane(backdrop_plane());
    builder.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 0.0, -3.0), 1.0), vec![opaque_surface()], None));
    let scene = builder.build(StorageKind::Blob);
    let raytracer = Raytracer::new(&scene, Options::default());

    let color = raytracer.trace(camera_ray(), Rgb::WHITE, 0, None, false);

    assert_eq!(color, Rgb::BLACK);
}
