//! A perfect mirror sphere facing the camera dead-on reflects the ray straight back
//! the way it came, so the camera-facing pixel is exactly the scene's own background.

use cgmath::{point3, vec3};
use raytracer::material::SurfaceMaterial;
use raytracer::math::{Normal3, Ray, Rgb};
use raytracer::raytracer::{Options, Raytracer};
use raytracer::scene::{SceneBuilder, StorageKind};
use raytracer::sceneobject::SceneObject;
use raytracer::shape::Sphere;
use std::sync::Arc;

fn mirror_material() -> Arc<SurfaceMaterial> {
    Arc::new(SurfaceMaterial {
        surface_color: Rgb::WHITE,
        emission_color: Rgb::ZERO,
        transparency: 0.0,
        reflectivity: 1.0,
        diffuse: 0.0,
        texture: None,
    })
}

#[test]
fn center_pixel_equals_background_exactly() {
    let mut builder = SceneBuilder::new();
    builder.set_background_color(Rgb::new(1.0, 1.0, 1.0));
    builder.add_sphere(SceneObject::new(Sphere::new(point3(0.0, 0.0, -3.0), 1.0), vec![mirror_material()], None));
    let scene = builder.build(StorageKind::Blob);

    let raytracer = Raytracer::new(&scene, Options::default());
    let ray = Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(0.0, 0.0, -1.0)));
    let color = raytracer.trace(ray, Rgb::WHITE, 0, None, false);

    assert_eq!(color, scene.background_color());
}
