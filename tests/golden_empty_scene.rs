//! An empty scene renders pure background at every pixel, through the full
//! camera/sampler/capture pipeline rather than a single hand-built ray.

use cgmath::vec3;
use raytracer::camera::Camera;
use raytracer::math::{Normal3, Point3};
use raytracer::raytracer::{Options, Raytracer};
use raytracer::sampler::SingleSample;
use raytracer::scene::{SceneBuilder, StorageKind};

fn camera() -> Camera {
    Camera::new(
        Point3::new(0.0, 0.0, 0.0),
        Normal3::new(vec3(0.0, 0.0, -1.0)),
        Normal3::new(vec3(0.0, 1.0, 0.0)),
        256,
        256,
        45.0_f32.to_radians(),
    )
}

#[test]
fn every_pixel_is_background() {
    let scene = SceneBuilder::new().build(StorageKind::Blob);
    let raytracer = Raytracer::new(&scene, Options::default());
    let image = raytracer.capture(&camera(), &SingleSample);

    assert_eq!(image.width(), 256);
    assert_eq!(image.height(), 256);
    for y in [0, 64, 128, 192, 255] {
        for x in [0, 64, 128, 192, 255] {
            assert_eq!(image.pixel(x, y), [0, 0, 0, 255], "pixel ({}, {}) was not background", x, y);
        }
    }
}
