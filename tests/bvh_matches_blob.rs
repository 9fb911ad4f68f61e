//! A BVH and a flat blob scan of the identical object set must agree on every ray's
//! nearest hit: same object, same distance, same point. The space partitioning is
//! purely an acceleration structure and must never change query results.

use cgmath::{point2, point3, vec3, InnerSpace};
use raytracer::bvh::MedianPartitioner;
use raytracer::material::SurfaceMaterial;
use raytracer::math::{Normal3, Ray};
use raytracer::scene::{SceneBuilder, StorageKind};
use raytracer::sceneobject::SceneObject;
use raytracer::shape::{AaBox, Sphere, Triangle};
use std::sync::Arc;

fn material(r: f32, g: f32, b: f32) -> Arc<SurfaceMaterial> {
    Arc::new(SurfaceMaterial {
        surface_color: raytracer::math::Rgb::new(r, g, b),
        emission_color: raytracer::math::Rgb::ZERO,
        transparency: 0.0,
        reflectivity: 0.0,
        diffuse: 1.0,
        texture: None,
    })
}

fn spheres() -> Vec<SceneObject<Sphere>> {
    (0..12)
        .map(|i| {
            let x = (i as f32 - 6.0) * 2.3;
            SceneObject::new(Sphere::new(point3(x, 0.0, -20.0), 0.9), vec![material(1.0, 0.2, 0.2)], None)
        })
        .collect()
}

fn aaboxes() -> Vec<SceneObject<AaBox>> {
    (0..8)
        .map(|i| {
            let y = (i as f32 - 4.0) * 2.5;
            SceneObject::new(AaBox::new(point3(-0.6, y - 0.6, -30.0), point3(0.6, y + 0.6, -29.0)), vec![material(0.2, 1.0, 0.2)], None)
        })
        .collect()
}

fn triangles() -> Vec<SceneObject<Triangle>> {
    (0..6)
        .map(|i| {
            let z = -10.0 - i as f32 * 4.0;
            SceneObject::new(
                Triangle::flat(
                    [point3(-3.0, -3.0, z), point3(3.0, -3.0, z), point3(0.0, 3.0, z)],
                    [point2(0.0, 0.0), point2(1.0, 0.0), point2(0.5, 1.0)],
                ),
                vec![material(0.2, 0.2, 1.0)],
                None,
            )
        })
        .collect()
}

fn probe_rays() -> Vec<Ray> {
    (0..200)
        .map(|i| {
            let u = (i as f32 / 200.0) * 2.0 - 1.0;
            let v = ((i * 37) % 200) as f32 / 200.0 * 2.0 - 1.0;
            Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(u, v, -1.0)))
        })
        .collect()
}

#[test]
fn bvh_and_blob_agree_on_every_probe_ray() {
    let spheres = spheres();
    let aaboxes = aaboxes();
    let triangles = triangles();

    let mut bvh_builder = SceneBuilder::new();
    let mut blob_builder = SceneBuilder::new();
    for s in &spheres {
        bvh_builder.add_sphere(s.clone());
        blob_builder.add_sphere(s.clone());
    }
    for b in &aaboxes {
        bvh_builder.add_aabox(b.clone());
        blob_builder.add_aabox(b.clone());
    }
    for t in &triangles {
        bvh_builder.add_triangle(t.clone());
        blob_builder.add_triangle(t.clone());
    }

    let bvh_scene = bvh_builder.build(StorageKind::bvh(&MedianPartitioner));
    let blob_scene = blob_builder.build(StorageKind::Blob);

    for ray in probe_rays() {
        let bvh_hit = bvh_scene.query_nearest(&ray);
        let blob_hit = blob_scene.query_nearest(&ray);

        match (bvh_hit, blob_hit) {
            (None, None) => {}
            (Some(a), Some(b)) => {
                assert_eq!(a.object_id(), b.object_id(), "disagree on which object was hit for ray {:?}", ray);
                assert!((a.t() - b.t()).abs() < 1e-4, "disagree on distance for ray {:?}: {} vs {}", ray, a.t(), b.t());
                let pa = a.resolve().point;
                let pb = b.resolve().point;
                assert!((pa - pb).magnitude() < 1e-4, "disagree on hit point for ray {:?}: {:?} vs {:?}", ray, pa, pb);
            }
            (a, b) => panic!("bvh and blob disagree on hit/miss for ray {:?}: {:?} vs {:?}", ray, a.is_some(), b.is_some()),
        }
    }
}
