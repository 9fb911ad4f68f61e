//! BVH construction and query throughput against a flat blob scan of the same
//! object set, across both partitioners.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use raytracer::bvh::{MeanPartitioner, MedianPartitioner};
use raytracer::material::SurfaceMaterial;
use raytracer::math::{Normal3, Ray, Rgb};
use raytracer::scene::{SceneBuilder, StorageKind};
use raytracer::sceneobject::SceneObject;
use raytracer::shape::Sphere;
use cgmath::{point3, vec3};
use std::sync::Arc;

fn material() -> Arc<SurfaceMaterial> {
    Arc::new(SurfaceMaterial {
        surface_color: Rgb::new(1.0, 1.0, 1.0),
        emission_color: Rgb::ZERO,
        transparency: 0.0,
        reflectivity: 0.0,
        diffuse: 1.0,
        texture: None,
    })
}

/// Spheres laid out on a grid so rays from the origin pass near varying numbers
/// of them depending on direction, rather than all lining up on one axis.
fn grid_scene(count: u32, storage: StorageKind<'_>) -> raytracer::scene::Scene {
    let side = (count as f64).sqrt().ceil() as u32;
    let mut builder = SceneBuilder::new();
    for i in 0..count {
        let x = (i % side) as f32 * 4.0 - (side as f32 * 2.0);
        let y = (i / side) as f32 * 4.0 - (side as f32 * 2.0);
        builder.add_sphere(SceneObject::new(Sphere::new(point3(x, y, -50.0), 1.0), vec![material()], None));
    }
    builder.build(storage)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bvh_build");
    for count in [64u32, 512, 4096] {
        group.bench_function(BenchmarkId::new("median", count), |b| {
            b.iter(|| grid_scene(black_box(count), StorageKind::bvh(&MedianPartitioner)))
        });
        group.bench_function(BenchmarkId::new("mean_order2", count), |b| {
            let partitioner = MeanPartitioner::new(2);
            b.iter(|| grid_scene(black_box(count), StorageKind::bvh(&partitioner)))
        });
        group.bench_function(BenchmarkId::new("blob", count), |b| {
            b.iter(|| grid_scene(black_box(count), StorageKind::Blob))
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let count = 2048;
    let bvh_scene = grid_scene(count, StorageKind::bvh(&MedianPartitioner));
    let blob_scene = grid_scene(count, StorageKind::Blob);

    let rays: Vec<Ray> = (0..64)
        .map(|i| {
            let angle = i as f32 * 0.05;
            Ray::new(point3(0.0, 0.0, 0.0), Normal3::new(vec3(angle.sin(), angle.cos() * 0.2, -1.0)))
        })
        .collect();

    let mut group = c.benchmark_group("query_nearest");
    group.bench_function("bvh", |b| {
        b.iter(|| {
            for ray in &rays {
                black_box(bvh_scene.query_nearest(black_box(ray)));
            }
        })
    });
    group.bench_function("blob", |b| {
        b.iter(|| {
            for ray in &rays {
                black_box(blob_scene.query_nearest(black_box(ray)));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
