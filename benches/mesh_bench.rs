#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use molsphere::{
    chem::{Atom, ElementTable, InstanceBuilder},
    mesh::sphere,
    renderer::instanced::pack_instances,
};

const ELEMENTS: [&str; 6] = ["C", "N", "O", "S", "H", "XX"];

fn synthetic_atoms(count: usize) -> Vec<Atom> {
    (0..count)
        .map(|i| {
            let t = i as f32;
            Atom::new(
                ELEMENTS[i % ELEMENTS.len()],
                Vec3::new(t.sin() * 20.0, t.cos() * 20.0, t * 0.01),
            )
        })
        .collect()
}

fn sphere_generation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere_generate");
    for (sectors, stacks) in [(12, 6), (36, 18), (128, 64)] {
        let _ = group.bench_with_input(
            BenchmarkId::from_parameter(format!("{sectors}x{stacks}")),
            &(sectors, stacks),
            |b, &(sectors, stacks)| {
                b.iter(|| {
                    sphere::generate(black_box(sectors), black_box(stacks))
                });
            },
        );
    }
    group.finish();
}

fn instance_build_benchmark(c: &mut Criterion) {
    let builder = InstanceBuilder::new(ElementTable::cpk());
    let mut group = c.benchmark_group("instance_build_and_pack");
    for count in [1_000, 10_000, 100_000] {
        let atoms = synthetic_atoms(count);
        let mut packed = Vec::with_capacity(count);
        let _ = group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &atoms,
            |b, atoms| {
                b.iter(|| {
                    let instances = builder.build_all(black_box(atoms));
                    pack_instances(&instances, &mut packed);
                    black_box(packed.len())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    sphere_generation_benchmark,
    instance_build_benchmark
);
criterion_main!(benches);
